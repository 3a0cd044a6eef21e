/*!
 * Tests for language utility functions
 */

use catdesc::language_utils::{
    get_language_name, language_codes_match, normalize_to_part1_or_part2t, normalize_to_part2t, resolve_language,
};

#[test]
fn test_normalizeToPart1OrPart2t_withThreeLetterCode_shouldPreferTwoLetter() {
    assert_eq!(normalize_to_part1_or_part2t("por").unwrap(), "pt");
    assert_eq!(normalize_to_part1_or_part2t("fre").unwrap(), "fr");
    assert_eq!(normalize_to_part1_or_part2t("EN").unwrap(), "en");
}

#[test]
fn test_normalizeToPart2t_withTwoLetterCode_shouldExpand() {
    assert_eq!(normalize_to_part2t("pt").unwrap(), "por");
    assert_eq!(normalize_to_part2t("de").unwrap(), "deu");
}

#[test]
fn test_languageCodesMatch_acrossFormats_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("pt-BR", "por"));
    assert!(language_codes_match("ger", "de"));
    assert!(!language_codes_match("en", "pt"));
}

#[test]
fn test_languageCodesMatch_withInvalidCode_shouldNotMatch() {
    assert!(!language_codes_match("xx", "xx"));
    assert!(!language_codes_match("", "en"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("pt").unwrap(), "Portuguese");
    assert_eq!(get_language_name("eng").unwrap(), "English");
}

#[test]
fn test_resolveLanguage_withInvalidCode_shouldFail() {
    assert!(resolve_language("english").is_err());
    assert!(resolve_language("zz").is_err());
}
