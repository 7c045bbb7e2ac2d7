/// Dispel categories an effect can respond to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DispelType {
    Magic,
    Curse,
    Poison,
    Disease,
    Physical,
    /// Wildcard: matches every removable effect.
    All,
}

/// Dispel metadata attached to an effect.
///
/// The default is not removable, so effects only become dispellable when a
/// caller opts in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispelInfo {
    /// Higher values are removed first.
    pub priority: u32,
    pub types: Vec<DispelType>,
    pub removable: bool,
}

impl DispelInfo {
    /// Removable effect responding to `types`.
    pub fn new(priority: u32, types: impl IntoIterator<Item = DispelType>) -> Self {
        Self {
            priority,
            types: types.into_iter().collect(),
            removable: true,
        }
    }

    /// Effect that no dispel can touch.
    pub fn unremovable() -> Self {
        Self::default()
    }

    /// Whether a dispel of `dispel_type` may remove this effect.
    pub fn responds_to(&self, dispel_type: DispelType) -> bool {
        self.removable && (dispel_type == DispelType::All || self.types.contains(&dispel_type))
    }
}
