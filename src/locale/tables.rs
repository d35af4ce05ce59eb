//! Static tables used to interpret POSIX locale names.
//!
//! All lookups are first-match and case-insensitive.

/// glibc script modifiers (`sr_RS@latin`) and their ISO 15924 codes.
pub(super) const SCRIPT_MODIFIERS: &[(&str, &str)] = &[
    ("Arabic", "Arab"),
    ("Imperial_Aramaic", "Armi"),
    ("Armenian", "Armn"),
    ("Avestan", "Avst"),
    ("Balinese", "Bali"),
    ("Bamum", "Bamu"),
    ("Bengali", "Beng"),
    ("Bopomofo", "Bopo"),
    ("Braille", "Brai"),
    ("Buginese", "Bugi"),
    ("Buhid", "Buhd"),
    ("Canadian_Aboriginal", "Cans"),
    ("Carian", "Cari"),
    ("Cham", "Cham"),
    ("Cherokee", "Cher"),
    ("Coptic", "Copt"),
    ("Cypriot", "Cprt"),
    ("Cyrillic", "Cyrl"),
    ("Devanagari", "Deva"),
    ("Deseret", "Dsrt"),
    ("Egyptian_Hierogyphs", "Egyp"),
    ("Ethiopic", "Ethi"),
    ("Georgian", "Geor"),
    ("Glagolitic", "Glag"),
    ("Gothic", "Goth"),
    ("Greek", "Grek"),
    ("Gujarati", "Gujr"),
    ("Gurmukhi", "Guru"),
    ("Hangul", "Hang"),
    ("Han", "Hani"),
    ("Hanunoo", "Hano"),
    ("Hebrew", "Hebr"),
    ("Hiragana", "Hira"),
    ("Katakana_Or_Hiragana", "Hrkt"),
    ("Old_Italic", "Ital"),
    ("Javanese", "Java"),
    ("Kayah_Li", "Kali"),
    ("Katakana", "Kana"),
    ("Kharoshthi", "Khar"),
    ("Khmer", "Khmr"),
    ("Kannada", "Knda"),
    ("Kaithi", "Kthi"),
    ("Tai_Tham", "Lana"),
    ("Lao", "Laoo"),
    ("Latin", "Latn"),
    ("Lepcha", "Lepc"),
    ("Limbu", "Limb"),
    ("Linear_B", "Linb"),
    ("Lisu", "Lisu"),
    ("Lycian", "Lyci"),
    ("Lydian", "Lydi"),
    ("Malayalam", "Mlym"),
    ("Mongolian", "Mong"),
    ("Meetei_Mayek", "Mtei"),
    ("Myanmar", "Mymr"),
    ("Nko", "Nkoo"),
    ("Ogham", "Ogam"),
    ("Ol_Chiki", "Olck"),
    ("Old_Turkic", "Orkh"),
    ("Oriya", "Orya"),
    ("Osmanya", "Osma"),
    ("Phags_Pa", "Phag"),
    ("Inscriptional_Pahlavi", "Phli"),
    ("Phoenician", "Phnx"),
    ("Inscriptional_Parthian", "Prti"),
    ("Rejang", "Rjng"),
    ("Runic", "Runr"),
    ("Samaritan", "Samr"),
    ("Old_South_Arabian", "Sarb"),
    ("Saurashtra", "Saur"),
    ("Shavian", "Shaw"),
    ("Sinhala", "Sinh"),
    ("Sundanese", "Sund"),
    ("Syloti_Nagri", "Sylo"),
    ("Syriac", "Syrc"),
    ("Tagbanwa", "Tagb"),
    ("Tai_Le", "Tale"),
    ("New_Tai_Lue", "Talu"),
    ("Tamil", "Taml"),
    ("Tai_Viet", "Tavt"),
    ("Telugu", "Telu"),
    ("Tifinagh", "Tfng"),
    ("Tagalog", "Tglg"),
    ("Thaana", "Thaa"),
    ("Thai", "Thai"),
    ("Tibetan", "Tibt"),
    ("Ugaritic", "Ugar"),
    ("Vai", "Vaii"),
    ("Old_Persian", "Xpeo"),
    ("Cuneiform", "Xsux"),
    ("Yi", "Yiii"),
    ("Inherited", "Zinh"),
    ("Common", "Zyyy"),
    ("Unknown", "Zzzz"),
];

/// Modifiers that name a registered variant (`ca_ES@valencia`).
pub(super) const VARIANT_MODIFIERS: &[(&str, &str)] = &[("valencia", "valencia")];

/// Modifiers kept as private use. `None` means the modifier carries no
/// language information and is dropped.
pub(super) const PRIVATEUSE_MODIFIERS: &[(&str, Option<&str>)] = &[
    // Euro currency marker.
    ("euro", None),
    // Width of East Asian ambiguous-width characters.
    ("cjknarrow", None),
    // Ge'ez abegede collation.
    ("abegede", Some("abegede")),
    // Tatar Latin orthography.
    ("iqtelif", Some("iqtel")),
];

/// Modifier that selects a script and also keeps a private use marker.
pub(super) const IQTELIF: &str = "iqtelif";

/// Single-word locale aliases from glibc's `locale.alias`.
pub(super) const LOCALE_ALIASES: &[(&str, &str)] = &[
    ("bokmal", "nb_NO.ISO-8859-1"),
    ("catalan", "ca_ES.ISO-8859-1"),
    ("croatian", "hr_HR.ISO-8859-2"),
    ("czech", "cs_CZ.ISO-8859-2"),
    ("danish", "da_DK.ISO-8859-1"),
    ("dansk", "da_DK.ISO-8859-1"),
    ("deutsch", "de_DE.ISO-8859-1"),
    ("dutch", "nl_NL.ISO-8859-1"),
    ("eesti", "et_EE.ISO-8859-1"),
    ("estonian", "et_EE.ISO-8859-1"),
    ("finnish", "fi_FI.ISO-8859-1"),
    ("french", "fr_FR.ISO-8859-1"),
    ("galego", "gl_ES.ISO-8859-1"),
    ("galician", "gl_ES.ISO-8859-1"),
    ("german", "de_DE.ISO-8859-1"),
    ("greek", "el_GR.ISO-8859-7"),
    ("hebrew", "he_IL.ISO-8859-8"),
    ("hrvatski", "hr_HR.ISO-8859-2"),
    ("hungarian", "hu_HU.ISO-8859-2"),
    ("icelandic", "is_IS.ISO-8859-1"),
    ("italian", "it_IT.ISO-8859-1"),
    ("japanese", "ja_JP.eucJP"),
    ("korean", "ko_KR.eucKR"),
    ("lithuanian", "lt_LT.ISO-8859-13"),
    ("norwegian", "nb_NO.ISO-8859-1"),
    ("nynorsk", "nn_NO.ISO-8859-1"),
    ("polish", "pl_PL.ISO-8859-2"),
    ("portuguese", "pt_PT.ISO-8859-1"),
    ("romanian", "ro_RO.ISO-8859-2"),
    ("russian", "ru_RU.ISO-8859-5"),
    ("slovak", "sk_SK.ISO-8859-2"),
    ("slovene", "sl_SI.ISO-8859-2"),
    ("slovenian", "sl_SI.ISO-8859-2"),
    ("spanish", "es_ES.ISO-8859-1"),
    ("swedish", "sv_SE.ISO-8859-1"),
    ("thai", "th_TH.TIS-620"),
    ("turkish", "tr_TR.ISO-8859-9"),
];

fn find<'a, V: Copy>(table: &'a [(&'a str, V)], key: &str) -> Option<V> {
    table
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| *v)
}

pub(super) fn script_from_modifier(modifier: &str) -> Option<&'static str> {
    find(SCRIPT_MODIFIERS, modifier)
}

/// Lower-cased modifier name for an ISO 15924 code (`Latn` to `latin`).
pub(super) fn modifier_from_script(script: &str) -> Option<String> {
    SCRIPT_MODIFIERS
        .iter()
        .find(|(_, code)| code.eq_ignore_ascii_case(script))
        .map(|(name, _)| name.to_ascii_lowercase())
}

pub(super) fn variant_from_modifier(modifier: &str) -> Option<&'static str> {
    find(VARIANT_MODIFIERS, modifier)
}

/// `Some(None)` for modifiers to drop, `None` for unknown modifiers.
pub(super) fn privateuse_from_modifier(modifier: &str) -> Option<Option<&'static str>> {
    find(PRIVATEUSE_MODIFIERS, modifier)
}

pub(super) fn locale_from_alias(alias: &str) -> Option<&'static str> {
    find(LOCALE_ALIASES, alias)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_lookup_case_insensitive() {
        assert_eq!(script_from_modifier("latin"), Some("Latn"));
        assert_eq!(script_from_modifier("CYRILLIC"), Some("Cyrl"));
        assert_eq!(script_from_modifier("klingon"), None);
    }

    #[test]
    fn test_reverse_script_lookup() {
        assert_eq!(modifier_from_script("Latn").as_deref(), Some("latin"));
        assert_eq!(modifier_from_script("Hans"), None);
    }

    #[test]
    fn test_privateuse_modifiers() {
        assert_eq!(privateuse_from_modifier("euro"), Some(None));
        assert_eq!(privateuse_from_modifier("iqtelif"), Some(Some("iqtel")));
        assert_eq!(privateuse_from_modifier("unknown"), None);
    }

    #[test]
    fn test_locale_alias() {
        assert_eq!(locale_from_alias("German"), Some("de_DE.ISO-8859-1"));
        assert_eq!(locale_from_alias("klingon"), None);
    }
}
