//! English display names for ISO-639-1 language codes

/// Resolve a display title, falling back to the code itself
pub fn display_title(code: &str) -> String {
    // Region or script subtags ("zh-Hans", "pt_BR") resolve by their primary tag
    let primary = code
        .split(['-', '_'])
        .next()
        .unwrap_or(code)
        .to_ascii_lowercase();

    match english_name(&primary) {
        Some(name) => name.to_string(),
        None => code.to_string(),
    }
}

fn english_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "af" => "Afrikaans",
        "ar" => "Arabic",
        "be" => "Belarusian",
        "bg" => "Bulgarian",
        "bn" => "Bangla",
        "ca" => "Catalan",
        "cs" => "Czech",
        "cy" => "Welsh",
        "da" => "Danish",
        "de" => "German",
        "el" => "Greek",
        "en" => "English",
        "eo" => "Esperanto",
        "es" => "Spanish",
        "et" => "Estonian",
        "fa" => "Persian",
        "fi" => "Finnish",
        "fr" => "French",
        "ga" => "Irish",
        "gl" => "Galician",
        "gu" => "Gujarati",
        "he" => "Hebrew",
        "hi" => "Hindi",
        "hr" => "Croatian",
        "ht" => "Haitian Creole",
        "hu" => "Hungarian",
        "id" => "Indonesian",
        "is" => "Icelandic",
        "it" => "Italian",
        "ja" => "Japanese",
        "ka" => "Georgian",
        "kn" => "Kannada",
        "ko" => "Korean",
        "lt" => "Lithuanian",
        "lv" => "Latvian",
        "mk" => "Macedonian",
        "mr" => "Marathi",
        "ms" => "Malay",
        "mt" => "Maltese",
        "nl" => "Dutch",
        "no" | "nb" => "Norwegian",
        "pl" => "Polish",
        "pt" => "Portuguese",
        "ro" => "Romanian",
        "ru" => "Russian",
        "sk" => "Slovak",
        "sl" => "Slovenian",
        "sq" => "Albanian",
        "sv" => "Swedish",
        "sw" => "Swahili",
        "ta" => "Tamil",
        "te" => "Telugu",
        "th" => "Thai",
        "tl" => "Tagalog",
        "tr" => "Turkish",
        "uk" => "Ukrainian",
        "ur" => "Urdu",
        "vi" => "Vietnamese",
        "zh" => "Chinese",
        "az" => "Azerbaijani",
        "eu" => "Basque",
        "ky" => "Kyrgyz",
        "kk" => "Kazakh",
        "pa" => "Punjabi",
        "sr" => "Serbian",
        "uz" => "Uzbek",
        _ => return None,
    };
    Some(name)
}
