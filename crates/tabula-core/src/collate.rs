//! String collation and search folding.
//!
//! [`Collator::new`] loads the CLDR collation of the configured locale with
//! ICU4X. `numeric`, `caseFirst` and the sensitivity map onto its options,
//! and `ignorePunctuation` makes whitespace and punctuation ignorable.
//!
//! Locales that do not parse or cannot be loaded use a built-in root order
//! instead: text is decomposed (NFD) into collation elements compared level
//! by level, base characters first, then accents, then case. Character
//! classes order as whitespace, punctuation, symbols, digits, letters. With
//! `numeric` set a run of ASCII digits is a single element ordered by its
//! value.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use icu_collator::options::{AlternateHandling, CaseLevel, CollatorOptions, Strength};
use icu_collator::preferences::{CollationCaseFirst, CollationNumericOrdering};
use icu_collator::{Collator as IcuCollator, CollatorBorrowed, CollatorPreferences};
use icu_locale_core::Locale;
use tabula_model::{CaseFirst, CollationOptions, Sensitivity};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Space,
    Punctuation,
    Symbol,
    Digit,
    Letter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Primary {
    Char(char),
    /// Digit run without leading zeros.
    Number(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    class: CharClass,
    primary: Primary,
    accents: Vec<char>,
    upper: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyRepr {
    /// Source text, compared by the locale collator.
    Text(String),
    /// Built-in collation elements.
    Elements(Vec<Element>),
}

/// Precomputed collation key of one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollationKey(KeyRepr);

impl CollationKey {
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            KeyRepr::Text(text) => text.is_empty(),
            KeyRepr::Elements(elements) => elements.is_empty(),
        }
    }
}

#[derive(Clone)]
struct Tailored(Arc<CollatorBorrowed<'static>>);

impl fmt::Debug for Tailored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tailored")
    }
}

#[derive(Debug, Clone)]
pub struct Collator {
    numeric: bool,
    case_first: CaseFirst,
    sensitivity: Sensitivity,
    ignore_punctuation: bool,
    tailored: Option<Tailored>,
}

impl Collator {
    /// Collator for `options.locale`, or the built-in root order when that
    /// locale cannot be loaded.
    pub fn new(options: &CollationOptions) -> Self {
        Self {
            tailored: load_tailored(options),
            ..Self::root(options)
        }
    }

    /// Collator that always uses the built-in root order.
    pub fn root(options: &CollationOptions) -> Self {
        Self {
            numeric: options.numeric,
            case_first: options.case_first,
            sensitivity: options.sensitivity,
            ignore_punctuation: options.ignore_punctuation,
            tailored: None,
        }
    }

    /// Whether comparisons follow the locale's own collation.
    pub fn is_tailored(&self) -> bool {
        self.tailored.is_some()
    }

    pub fn key(&self, text: &str) -> CollationKey {
        if self.tailored.is_some() {
            return CollationKey(KeyRepr::Text(text.to_string()));
        }
        CollationKey(KeyRepr::Elements(self.elements(text)))
    }

    pub fn compare_keys(&self, a: &CollationKey, b: &CollationKey) -> Ordering {
        match (&a.0, &b.0) {
            (KeyRepr::Text(x), KeyRepr::Text(y)) => self.compare(x, y),
            (KeyRepr::Elements(x), KeyRepr::Elements(y)) => self.compare_elements(x, y),
            (KeyRepr::Text(_), KeyRepr::Elements(_)) => Ordering::Less,
            (KeyRepr::Elements(_), KeyRepr::Text(_)) => Ordering::Greater,
        }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.tailored {
            Some(Tailored(collator)) => collator.compare(a, b),
            None => self.compare_elements(&self.elements(a), &self.elements(b)),
        }
    }

    /// Folds text for substring search under the configured sensitivity.
    /// Whitespace is kept; punctuation is dropped when `ignore_punctuation`.
    pub fn fold(&self, text: &str) -> String {
        let accents = self.sensitivity.distinguishes_accents();
        let case = self.sensitivity.distinguishes_case();
        let mut out = String::with_capacity(text.len());
        for ch in text.nfd() {
            if is_combining_mark(ch) {
                if accents {
                    out.push(ch);
                }
                continue;
            }
            if self.ignore_punctuation && classify(ch) == CharClass::Punctuation {
                continue;
            }
            if case {
                out.push(ch);
            } else {
                out.extend(
                    ch.to_lowercase()
                        .filter(|&c| accents || !is_combining_mark(c)),
                );
            }
        }
        out
    }

    fn case_rank(&self, element: &Element) -> u8 {
        match (self.case_first, element.upper) {
            (CaseFirst::Upper, true) | (CaseFirst::Lower | CaseFirst::Off, false) => 0,
            _ => 1,
        }
    }

    fn elements(&self, text: &str) -> Vec<Element> {
        let mut elements: Vec<Element> = Vec::new();
        let mut chars = text.nfd().peekable();
        while let Some(ch) = chars.next() {
            if is_combining_mark(ch) {
                if let Some(last) = elements.last_mut() {
                    last.accents.push(ch);
                }
                continue;
            }
            let class = classify(ch);
            if self.ignore_punctuation && matches!(class, CharClass::Space | CharClass::Punctuation)
            {
                continue;
            }
            if self.numeric && ch.is_ascii_digit() {
                let mut digits = String::from(ch);
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    digits.push(next);
                    chars.next();
                }
                let value = match digits.trim_start_matches('0') {
                    "" => "0",
                    trimmed => trimmed,
                };
                elements.push(Element {
                    class: CharClass::Digit,
                    primary: Primary::Number(value.to_string()),
                    accents: Vec::new(),
                    upper: false,
                });
                continue;
            }
            let mut lower = ch.to_lowercase();
            let base = lower.next().unwrap_or(ch);
            elements.push(Element {
                class,
                primary: Primary::Char(base),
                accents: lower.filter(|&c| is_combining_mark(c)).collect(),
                upper: ch.is_uppercase(),
            });
        }
        elements
    }

    fn compare_elements(&self, a: &[Element], b: &[Element]) -> Ordering {
        let primary = compare_by(a, b, compare_primary);
        if primary != Ordering::Equal {
            return primary;
        }
        if self.sensitivity.distinguishes_accents() {
            let secondary = compare_by(a, b, |x, y| x.accents.cmp(&y.accents));
            if secondary != Ordering::Equal {
                return secondary;
            }
        }
        if self.sensitivity.distinguishes_case() {
            return compare_by(a, b, |x, y| self.case_rank(x).cmp(&self.case_rank(y)));
        }
        Ordering::Equal
    }
}

fn load_tailored(options: &CollationOptions) -> Option<Tailored> {
    let locale = match options.locale.parse::<Locale>() {
        Ok(locale) => locale,
        Err(error) => {
            debug!(
                locale = %options.locale,
                %error,
                "unparsable collation locale, using root order"
            );
            return None;
        }
    };
    let mut preferences = CollatorPreferences::from(locale);
    preferences.numeric_ordering = Some(if options.numeric {
        CollationNumericOrdering::True
    } else {
        CollationNumericOrdering::False
    });
    preferences.case_first = Some(match options.case_first {
        CaseFirst::Upper => CollationCaseFirst::Upper,
        CaseFirst::Lower => CollationCaseFirst::Lower,
        CaseFirst::Off => CollationCaseFirst::False,
    });

    let (strength, case_level) = match options.sensitivity {
        Sensitivity::Base => (Strength::Primary, CaseLevel::Off),
        Sensitivity::Accent => (Strength::Secondary, CaseLevel::Off),
        Sensitivity::Case => (Strength::Primary, CaseLevel::On),
        Sensitivity::Variant => (Strength::Tertiary, CaseLevel::Off),
    };
    let mut icu_options = CollatorOptions::default();
    icu_options.strength = Some(strength);
    icu_options.case_level = Some(case_level);
    icu_options.alternate_handling = Some(if options.ignore_punctuation {
        AlternateHandling::Shifted
    } else {
        AlternateHandling::NonIgnorable
    });

    match IcuCollator::try_new(preferences, icu_options) {
        Ok(collator) => Some(Tailored(Arc::new(collator))),
        Err(error) => {
            debug!(
                locale = %options.locale,
                %error,
                "collation data unavailable, using root order"
            );
            None
        }
    }
}

fn compare_by<F>(a: &[Element], b: &[Element], mut f: F) -> Ordering
where
    F: FnMut(&Element, &Element) -> Ordering,
{
    a.iter()
        .zip(b)
        .map(|(x, y)| f(x, y))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn compare_primary(a: &Element, b: &Element) -> Ordering {
    a.class
        .cmp(&b.class)
        .then_with(|| match (&a.primary, &b.primary) {
            (Primary::Number(x), Primary::Number(y)) => {
                x.len().cmp(&y.len()).then_with(|| x.cmp(y))
            }
            (Primary::Char(x), Primary::Char(y)) => x.cmp(y),
            (Primary::Number(_), Primary::Char(_)) => Ordering::Less,
            (Primary::Char(_), Primary::Number(_)) => Ordering::Greater,
        })
}

fn classify(ch: char) -> CharClass {
    if ch.is_whitespace() || ch.is_control() {
        CharClass::Space
    } else if ch.is_alphabetic() {
        CharClass::Letter
    } else if ch.is_numeric() {
        CharClass::Digit
    } else if is_punctuation(ch) {
        CharClass::Punctuation
    } else {
        CharClass::Symbol
    }
}

fn is_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '!' | '"'
            | '#'
            | '%'
            | '&'
            | '\''
            | '('
            | ')'
            | '*'
            | ','
            | '-'
            | '.'
            | '/'
            | ':'
            | ';'
            | '?'
            | '@'
            | '['
            | '\\'
            | ']'
            | '_'
            | '{'
            | '}'
            | '\u{a1}'
            | '\u{a7}'
            | '\u{ab}'
            | '\u{b6}'
            | '\u{b7}'
            | '\u{bb}'
            | '\u{bf}'
            | '\u{2010}'..='\u{2027}'
            | '\u{2030}'..='\u{205e}'
            | '\u{3001}'..='\u{3003}'
            | '\u{3008}'..='\u{3011}'
    )
}
