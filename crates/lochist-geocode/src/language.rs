/// Primary language for a country code, or the code itself when unmapped
pub fn language_for_country(country_code: &str) -> String {
    let code = country_code.trim().to_lowercase();
    let language = match code.as_str() {
        "fi" => "fi",
        "se" => "sv",
        "no" => "nb",
        "dk" => "da",
        "de" => "de",
        "fr" => "fr",
        "ru" => "ru",
        "us" | "gb" => "en",
        other => other,
    };
    language.to_string()
}
