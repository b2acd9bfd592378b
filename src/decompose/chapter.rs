//! ICD-10-CM chapters
//!
//! Chapters follow from the chapter letter and, for the letters `D` and `H`
//! which are shared by two chapters, from the category digits.

use std::fmt;

/// ICD-10-CM chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IcdChapter {
    /// A00-B99
    Infectious = 1,
    /// C00-D49
    Neoplasms = 2,
    /// D50-D89
    Blood = 3,
    /// E00-E89
    Endocrine = 4,
    /// F01-F99
    Mental = 5,
    /// G00-G99
    Nervous = 6,
    /// H00-H59
    Eye = 7,
    /// H60-H95
    Ear = 8,
    /// I00-I99
    Circulatory = 9,
    /// J00-J99
    Respiratory = 10,
    /// K00-K95
    Digestive = 11,
    /// L00-L99
    Skin = 12,
    /// M00-M99
    Musculoskeletal = 13,
    /// N00-N99
    Genitourinary = 14,
    /// O00-O9A
    Pregnancy = 15,
    /// P00-P96
    Perinatal = 16,
    /// Q00-Q99
    Congenital = 17,
    /// R00-R99
    Symptoms = 18,
    /// S00-T88
    Injury = 19,
    /// V00-Y99
    ExternalCauses = 20,
    /// Z00-Z99
    HealthStatus = 21,
    /// U00-U85
    SpecialPurpose = 22,
}

impl IcdChapter {
    /// Determine the chapter from the chapter letter and category digits
    ///
    /// Returns `None` for letters outside the classification or, for `D` and
    /// `H`, when the category is not numeric.
    #[must_use]
    pub fn from_parts(letter: char, category: &str) -> Option<Self> {
        let digits = || category.parse::<u8>().ok();
        let chapter = match letter {
            'A' | 'B' => Self::Infectious,
            'C' => Self::Neoplasms,
            'D' if digits()? < 50 => Self::Neoplasms,
            'D' => Self::Blood,
            'E' => Self::Endocrine,
            'F' => Self::Mental,
            'G' => Self::Nervous,
            'H' if digits()? < 60 => Self::Eye,
            'H' => Self::Ear,
            'I' => Self::Circulatory,
            'J' => Self::Respiratory,
            'K' => Self::Digestive,
            'L' => Self::Skin,
            'M' => Self::Musculoskeletal,
            'N' => Self::Genitourinary,
            'O' => Self::Pregnancy,
            'P' => Self::Perinatal,
            'Q' => Self::Congenital,
            'R' => Self::Symptoms,
            'S' | 'T' => Self::Injury,
            'V' | 'W' | 'X' | 'Y' => Self::ExternalCauses,
            'Z' => Self::HealthStatus,
            'U' => Self::SpecialPurpose,
            _ => return None,
        };
        Some(chapter)
    }

    /// Determine the chapter of a dotted or undotted code
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.trim().chars();
        let letter = chars.next()?;
        let category: String = chars.take(2).collect();
        Self::from_parts(letter, &category)
    }

    /// Chapter number as a roman numeral
    #[must_use]
    pub const fn roman(self) -> &'static str {
        match self {
            Self::Infectious => "I",
            Self::Neoplasms => "II",
            Self::Blood => "III",
            Self::Endocrine => "IV",
            Self::Mental => "V",
            Self::Nervous => "VI",
            Self::Eye => "VII",
            Self::Ear => "VIII",
            Self::Circulatory => "IX",
            Self::Respiratory => "X",
            Self::Digestive => "XI",
            Self::Skin => "XII",
            Self::Musculoskeletal => "XIII",
            Self::Genitourinary => "XIV",
            Self::Pregnancy => "XV",
            Self::Perinatal => "XVI",
            Self::Congenital => "XVII",
            Self::Symptoms => "XVIII",
            Self::Injury => "XIX",
            Self::ExternalCauses => "XX",
            Self::HealthStatus => "XXI",
            Self::SpecialPurpose => "XXII",
        }
    }

    /// Short chapter title
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Infectious => "Certain infectious and parasitic diseases",
            Self::Neoplasms => "Neoplasms",
            Self::Blood => "Diseases of the blood and immune mechanism",
            Self::Endocrine => "Endocrine, nutritional and metabolic diseases",
            Self::Mental => "Mental, behavioral and neurodevelopmental disorders",
            Self::Nervous => "Diseases of the nervous system",
            Self::Eye => "Diseases of the eye and adnexa",
            Self::Ear => "Diseases of the ear and mastoid process",
            Self::Circulatory => "Diseases of the circulatory system",
            Self::Respiratory => "Diseases of the respiratory system",
            Self::Digestive => "Diseases of the digestive system",
            Self::Skin => "Diseases of the skin and subcutaneous tissue",
            Self::Musculoskeletal => "Diseases of the musculoskeletal system",
            Self::Genitourinary => "Diseases of the genitourinary system",
            Self::Pregnancy => "Pregnancy, childbirth and the puerperium",
            Self::Perinatal => "Certain conditions originating in the perinatal period",
            Self::Congenital => "Congenital malformations and chromosomal abnormalities",
            Self::Symptoms => "Symptoms, signs and abnormal findings",
            Self::Injury => "Injury, poisoning and other external consequences",
            Self::ExternalCauses => "External causes of morbidity",
            Self::HealthStatus => "Factors influencing health status",
            Self::SpecialPurpose => "Codes for special purposes",
        }
    }
}

impl fmt::Display for IcdChapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.roman(), self.title())
    }
}
