//! Server/session records read from `Game.ini`.

use std::collections::BTreeMap;
use std::fmt;

use asb_submit_core::{Guid, OFFICIAL_SERVER, OFFICIAL_SINGLEPLAYER};
use asb_submit_ini::IniDocument;

use crate::dino::DinoRecord;

/// Section of `Game.ini` that holds game-mode switches.
pub const GAME_MODE_SECTION: &str = "/script/shootergame.shootergamemode";
pub const SINGLEPLAYER_KEY: &str = "bUseSingleplayerSettings";
pub const MOD_IDS_KEY: &str = "ModIDS";

/// Class-name prefix → modification id, used to infer active mods from the
/// creatures in a submission.
pub type ModTable = BTreeMap<String, String>;

/// How the session identifier is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionProfile {
    /// Hash of the server configuration text.
    #[default]
    Content,
    OfficialServer,
    OfficialSingleplayer,
}

impl SessionProfile {
    pub fn is_official(self) -> bool {
        self != Self::Content
    }
}

impl fmt::Display for SessionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Content => "unofficial",
            Self::OfficialServer => "official server",
            Self::OfficialSingleplayer => "official singleplayer",
        })
    }
}

/// The server a submission came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionRecord {
    /// Normalized server configuration; empty when none was supplied.
    pub config: IniDocument,
    /// Active modification ids, in first-seen order.
    pub mods: Vec<String>,
    pub profile: SessionProfile,
    pub guid: Guid,
}

/// Identifier derived from server configuration text: the MD5 digest read
/// as a big-endian 128-bit integer.
pub fn content_guid(text: &str) -> Guid {
    let digest = md5::compute(text.as_bytes()).0;
    Guid::from_int(u128::from_be_bytes(digest))
}

/// Mod ids whose class prefix matches any creature's `DinoClass`, each
/// listed once, in order of first match.
pub fn infer_mods<'a, I>(dinos: I, table: &ModTable) -> Vec<String>
where
    I: IntoIterator<Item = &'a DinoRecord>,
{
    let mut mods: Vec<String> = Vec::new();
    for dino in dinos {
        for (prefix, id) in table {
            if dino.data.dino_class.starts_with(prefix.as_str()) && !mods.contains(id) {
                mods.push(id.clone());
            }
        }
    }
    mods
}

impl SessionRecord {
    /// Build the session record.
    ///
    /// `server_text` is the decoded `Game.ini`, when one was supplied. An
    /// explicit `ModIDS=` list wins over inference from `dinos`.
    pub fn extract<'a, I>(
        config: IniDocument,
        server_text: Option<&str>,
        explicit_mods: Option<Vec<String>>,
        dinos: I,
        mod_table: &ModTable,
        profile: SessionProfile,
    ) -> Self
    where
        I: IntoIterator<Item = &'a DinoRecord>,
    {
        let mods = match explicit_mods {
            Some(mods) => mods,
            None => infer_mods(dinos, mod_table),
        };
        let content = server_text.map(content_guid).unwrap_or_default();
        let mut session = Self {
            config,
            mods,
            profile: SessionProfile::Content,
            guid: content,
        };
        session.set_profile(profile);
        session
    }

    pub fn has_config(&self) -> bool {
        !self.config.is_empty()
    }

    /// Switch to an official profile. The singleplayer profile also turns
    /// on singleplayer settings in the configuration. Switching back to
    /// [`SessionProfile::Content`] keeps the current identifier.
    pub fn set_profile(&mut self, profile: SessionProfile) {
        self.profile = profile;
        match profile {
            SessionProfile::Content => {}
            SessionProfile::OfficialServer => self.guid = OFFICIAL_SERVER,
            SessionProfile::OfficialSingleplayer => {
                self.guid = OFFICIAL_SINGLEPLAYER;
                self.config.set(GAME_MODE_SECTION, SINGLEPLAYER_KEY, "True");
            }
        }
    }

    /// Replace the configuration with a separately delivered `Game.ini`.
    pub fn replace_config(&mut self, config: IniDocument, text: &str, mod_ids: Option<Vec<String>>) {
        self.config = config;
        if let Some(mods) = mod_ids {
            self.mods = mods;
        }
        if self.profile == SessionProfile::Content {
            self.guid = content_guid(text);
        }
    }

    /// The configuration to publish, with the active mods written back
    /// under [`GAME_MODE_SECTION`].
    pub fn to_document(&self) -> IniDocument {
        let mut doc = self.config.clone();
        if !self.mods.is_empty() {
            doc.set(GAME_MODE_SECTION, MOD_IDS_KEY, self.mods.join(", "));
        }
        doc
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
