use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer region: one of the Brazilian federative units.
///
/// Codes outside the closed set are kept verbatim in `Unmapped` so they
/// group like any other region instead of failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RegionCode {
    Ac,
    Al,
    Ap,
    Am,
    Ba,
    Ce,
    Df,
    Es,
    Go,
    Ma,
    Mt,
    Ms,
    Mg,
    Pa,
    Pb,
    Pr,
    Pe,
    Pi,
    Rj,
    Rn,
    Rs,
    Ro,
    Rr,
    Sc,
    Sp,
    Se,
    To,
    Unmapped(String),
}

impl RegionCode {
    /// Two-letter code as it appears in the dataset
    pub fn code(&self) -> &str {
        match self {
            RegionCode::Ac => "AC",
            RegionCode::Al => "AL",
            RegionCode::Ap => "AP",
            RegionCode::Am => "AM",
            RegionCode::Ba => "BA",
            RegionCode::Ce => "CE",
            RegionCode::Df => "DF",
            RegionCode::Es => "ES",
            RegionCode::Go => "GO",
            RegionCode::Ma => "MA",
            RegionCode::Mt => "MT",
            RegionCode::Ms => "MS",
            RegionCode::Mg => "MG",
            RegionCode::Pa => "PA",
            RegionCode::Pb => "PB",
            RegionCode::Pr => "PR",
            RegionCode::Pe => "PE",
            RegionCode::Pi => "PI",
            RegionCode::Rj => "RJ",
            RegionCode::Rn => "RN",
            RegionCode::Rs => "RS",
            RegionCode::Ro => "RO",
            RegionCode::Rr => "RR",
            RegionCode::Sc => "SC",
            RegionCode::Sp => "SP",
            RegionCode::Se => "SE",
            RegionCode::To => "TO",
            RegionCode::Unmapped(code) => code,
        }
    }

    /// Parse a region code. Never fails: unknown codes become `Unmapped`.
    pub fn from_code(code: &str) -> Self {
        let normalized = code.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "AC" => RegionCode::Ac,
            "AL" => RegionCode::Al,
            "AP" => RegionCode::Ap,
            "AM" => RegionCode::Am,
            "BA" => RegionCode::Ba,
            "CE" => RegionCode::Ce,
            "DF" => RegionCode::Df,
            "ES" => RegionCode::Es,
            "GO" => RegionCode::Go,
            "MA" => RegionCode::Ma,
            "MT" => RegionCode::Mt,
            "MS" => RegionCode::Ms,
            "MG" => RegionCode::Mg,
            "PA" => RegionCode::Pa,
            "PB" => RegionCode::Pb,
            "PR" => RegionCode::Pr,
            "PE" => RegionCode::Pe,
            "PI" => RegionCode::Pi,
            "RJ" => RegionCode::Rj,
            "RN" => RegionCode::Rn,
            "RS" => RegionCode::Rs,
            "RO" => RegionCode::Ro,
            "RR" => RegionCode::Rr,
            "SC" => RegionCode::Sc,
            "SP" => RegionCode::Sp,
            "SE" => RegionCode::Se,
            "TO" => RegionCode::To,
            _ => RegionCode::Unmapped(normalized),
        }
    }

    pub fn is_mapped(&self) -> bool {
        !matches!(self, RegionCode::Unmapped(_))
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<String> for RegionCode {
    fn from(value: String) -> Self {
        RegionCode::from_code(&value)
    }
}

impl From<RegionCode> for String {
    fn from(value: RegionCode) -> Self {
        value.code().to_string()
    }
}
