use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MenuError;

/// Attachment points on the character body and wardrobe (the game's MPN
/// table). Declaration order is meaningful: `Wear..=Onepiece` is the
/// contiguous wear range, with `AccHa` the one identifier inside it that
/// is not a wearable slot.
///
/// `Body` doubles as the unresolved/default identifier for menu files
/// whose category string the catalog does not recognize.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Slot {
    #[default]
    Body,
    Head,
    HairF,
    HairR,
    HairT,
    HairS,
    Skin,
    Chikubi,
    Underhair,
    Hokuro,
    Mayu,
    Lip,
    Eye,
    Nose,
    Facegloss,
    Wear,
    Skirt,
    Mizugi,
    Bra,
    Panz,
    Stkg,
    Shoes,
    Headset,
    Glove,
    Megane,
    AccHa,
    AccHana,
    AccKami,
    AccMimi,
    AccKubi,
    AccKubiwa,
    AccHeso,
    AccUde,
    AccAshi,
    AccSenaka,
    AccShippo,
    AccXxx,
    HandItem,
    AccHat,
    Onepiece,
}

impl Slot {
    pub const WEAR_START: Slot = Slot::Wear;
    pub const WEAR_END: Slot = Slot::Onepiece;

    /// Mask sub-parts the aggregate `Chikubi` slot expands to on write.
    /// These are body-slot names, not slot identifiers of their own.
    pub const CHIKUBI_MASK_PARTS: [&'static str; 2] = ["accNipL", "accNipR"];

    pub const ALL: [Slot; 40] = [
        Slot::Body,
        Slot::Head,
        Slot::HairF,
        Slot::HairR,
        Slot::HairT,
        Slot::HairS,
        Slot::Skin,
        Slot::Chikubi,
        Slot::Underhair,
        Slot::Hokuro,
        Slot::Mayu,
        Slot::Lip,
        Slot::Eye,
        Slot::Nose,
        Slot::Facegloss,
        Slot::Wear,
        Slot::Skirt,
        Slot::Mizugi,
        Slot::Bra,
        Slot::Panz,
        Slot::Stkg,
        Slot::Shoes,
        Slot::Headset,
        Slot::Glove,
        Slot::Megane,
        Slot::AccHa,
        Slot::AccHana,
        Slot::AccKami,
        Slot::AccMimi,
        Slot::AccKubi,
        Slot::AccKubiwa,
        Slot::AccHeso,
        Slot::AccUde,
        Slot::AccAshi,
        Slot::AccSenaka,
        Slot::AccShippo,
        Slot::AccXxx,
        Slot::HandItem,
        Slot::AccHat,
        Slot::Onepiece,
    ];

    /// Resolve a slot name case-insensitively.
    pub fn parse(name: &str) -> Result<Self, MenuError> {
        Self::ALL
            .iter()
            .copied()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| MenuError::UnknownSlot(name.to_string()))
    }

    /// Canonical lower-case name as it appears in menu category strings.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Slot::Body => "body",
            Slot::Head => "head",
            Slot::HairF => "hairf",
            Slot::HairR => "hairr",
            Slot::HairT => "hairt",
            Slot::HairS => "hairs",
            Slot::Skin => "skin",
            Slot::Chikubi => "chikubi",
            Slot::Underhair => "underhair",
            Slot::Hokuro => "hokuro",
            Slot::Mayu => "mayu",
            Slot::Lip => "lip",
            Slot::Eye => "eye",
            Slot::Nose => "nose",
            Slot::Facegloss => "facegloss",
            Slot::Wear => "wear",
            Slot::Skirt => "skirt",
            Slot::Mizugi => "mizugi",
            Slot::Bra => "bra",
            Slot::Panz => "panz",
            Slot::Stkg => "stkg",
            Slot::Shoes => "shoes",
            Slot::Headset => "headset",
            Slot::Glove => "glove",
            Slot::Megane => "megane",
            Slot::AccHa => "accha",
            Slot::AccHana => "acchana",
            Slot::AccKami => "acckami",
            Slot::AccMimi => "accmimi",
            Slot::AccKubi => "acckubi",
            Slot::AccKubiwa => "acckubiwa",
            Slot::AccHeso => "accheso",
            Slot::AccUde => "accude",
            Slot::AccAshi => "accashi",
            Slot::AccSenaka => "accsenaka",
            Slot::AccShippo => "accshippo",
            Slot::AccXxx => "accxxx",
            Slot::HandItem => "handitem",
            Slot::AccHat => "acchat",
            Slot::Onepiece => "onepiece",
        }
    }

    /// True for clothing/accessory slots: inside the wear range and not
    /// the excluded `accha` identifier.
    pub fn is_wear_slot(&self) -> bool {
        Self::WEAR_START <= *self && *self <= Self::WEAR_END && *self != Slot::AccHa
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
