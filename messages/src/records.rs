//! Structured records carried inside messages.

use bitstream::{BitReader, BitWriter};
use codec::{CodecResult, Serializable};

macro_rules! id_list {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub data: Vec<u32>,
        }

        impl $name {
            #[must_use]
            pub fn new(data: Vec<u32>) -> Self {
                Self { data }
            }
        }

        impl Serializable for $name {
            fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
                self.data.serialize(writer)
            }

            fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
                Ok(Self {
                    data: Vec::deserialize(reader)?,
                })
            }
        }
    };
}

id_list!(
    /// Identifiers of world objects.
    Objects
);

id_list!(
    /// Identifiers of every object replicated to a client.
    FullObjects
);

id_list!(
    /// Identifiers of scripts a client must load.
    Scripts
);

/// A game object identifier qualified by the mod that defines it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GameId {
    pub mod_id: u32,
    pub base_id: u32,
}

impl GameId {
    #[must_use]
    pub const fn new(mod_id: u32, base_id: u32) -> Self {
        Self { mod_id, base_id }
    }
}

impl Serializable for GameId {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        self.mod_id.serialize(writer)?;
        self.base_id.serialize(writer)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        let mod_id = u32::deserialize(reader)?;
        let base_id = u32::deserialize(reader)?;
        Ok(Self { mod_id, base_id })
    }
}

/// A loaded mod and the short id the server assigned it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mod {
    pub filename: String,
    pub id: u16,
}

impl Mod {
    #[must_use]
    pub fn new(filename: impl Into<String>, id: u16) -> Self {
        Self {
            filename: filename.into(),
            id,
        }
    }
}

impl Serializable for Mod {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        self.filename.serialize(writer)?;
        self.id.serialize(writer)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        let filename = String::deserialize(reader)?;
        let id = u16::deserialize(reader)?;
        Ok(Self { filename, id })
    }
}

/// The mod load order, split into standard and lite mods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mods {
    pub standard_mods: Vec<Mod>,
    pub lite_mods: Vec<Mod>,
}

impl Serializable for Mods {
    fn serialize(&self, writer: &mut BitWriter<'_>) -> CodecResult<()> {
        self.standard_mods.serialize(writer)?;
        self.lite_mods.serialize(writer)
    }

    fn deserialize(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        let standard_mods = Vec::deserialize(reader)?;
        let lite_mods = Vec::deserialize(reader)?;
        Ok(Self {
            standard_mods,
            lite_mods,
        })
    }
}
