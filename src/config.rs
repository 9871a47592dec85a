//! Command definition table loading and management.
//!
//! The outbound parser validates user-typed slash commands against this
//! table: spelling, aliases, argument names, permission tier, and how the
//! focused channel is substituted. The table is configuration, not engine
//! logic — deployments can override it from a TOML file, and a complete
//! built-in default ships so the engine works stand-alone.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read command table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse command table: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Permission tier required to issue a command. Ordered: a caller may issue
/// any command at or below their own tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// Any user.
    #[default]
    User,
    /// Channel moderator (or owner) of the focused channel.
    Moderator,
    /// Global moderator.
    GlobalMod,
    /// Server admin.
    Admin,
}

/// One slash-command definition.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandDef {
    /// Primary name, without the slash.
    pub name: String,
    /// Wire tag the command serializes to.
    pub tag: String,
    /// Alternative spellings.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Required tier.
    #[serde(default)]
    pub permission: PermissionLevel,
    /// Required argument names, in order. The last one is greedy and takes
    /// the remainder of the line.
    #[serde(default)]
    pub required: Vec<String>,
    /// Optional argument names, consumed after the required ones.
    #[serde(default)]
    pub optional: Vec<String>,
    /// Whether the focused channel is substituted as the `channel` field.
    #[serde(default)]
    pub channel_target: bool,
    /// Fixed fields stamped onto every instance (e.g. `action = "add"`).
    #[serde(default)]
    pub presets: BTreeMap<String, String>,
}

impl CommandDef {
    /// Usage line for error text: `name <req> [opt]`.
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        for arg in &self.required {
            usage.push_str(&format!(" <{arg}>"));
        }
        for arg in &self.optional {
            usage.push_str(&format!(" [{arg}]"));
        }
        usage
    }
}

/// The command definition table, indexed by name and alias.
#[derive(Debug)]
pub struct CommandTable {
    defs: Vec<CommandDef>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Deserialize)]
struct CommandFile {
    command: Vec<CommandDef>,
}

impl CommandTable {
    /// Build a table from explicit definitions. Later duplicates of a name
    /// or alias are ignored.
    pub fn from_defs(defs: Vec<CommandDef>) -> Self {
        let mut index = HashMap::new();
        for (i, def) in defs.iter().enumerate() {
            index.entry(def.name.to_ascii_lowercase()).or_insert(i);
            for alias in &def.aliases {
                index.entry(alias.to_ascii_lowercase()).or_insert(i);
            }
        }
        Self { defs, index }
    }

    /// Load a table from a TOML file of `[[command]]` blocks.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let file: CommandFile = toml::from_str(&content)?;
        Ok(Self::from_defs(file.command))
    }

    /// Resolve a typed name or alias, case-insensitively.
    pub fn resolve(&self, name: &str) -> Option<&CommandDef> {
        self.index.get(&name.to_ascii_lowercase()).map(|&i| &self.defs[i])
    }

    /// All definitions.
    pub fn defs(&self) -> &[CommandDef] {
        &self.defs
    }

    /// The built-in command set.
    pub fn defaults() -> Self {
        fn def(name: &str, tag: &str) -> CommandDef {
            CommandDef {
                name: name.to_string(),
                tag: tag.to_string(),
                aliases: Vec::new(),
                permission: PermissionLevel::User,
                required: Vec::new(),
                optional: Vec::new(),
                channel_target: false,
                presets: BTreeMap::new(),
            }
        }
        fn args(mut d: CommandDef, required: &[&str]) -> CommandDef {
            d.required = required.iter().map(|s| s.to_string()).collect();
            d
        }
        fn tier(mut d: CommandDef, permission: PermissionLevel) -> CommandDef {
            d.permission = permission;
            d
        }
        fn channel(mut d: CommandDef) -> CommandDef {
            d.channel_target = true;
            d
        }
        fn alias(mut d: CommandDef, aliases: &[&str]) -> CommandDef {
            d.aliases = aliases.iter().map(|s| s.to_string()).collect();
            d
        }
        fn preset(mut d: CommandDef, key: &str, value: &str) -> CommandDef {
            d.presets.insert(key.to_string(), value.to_string());
            d
        }

        use PermissionLevel::{Admin, GlobalMod, Moderator};

        let mut defs = Vec::new();

        // Anyone.
        defs.push(args(def("status", "STA"), &["status", "statusmsg"]));
        defs.push(args(def("join", "JCH"), &["channel"]));
        defs.push(channel(alias(def("leave", "LCH"), &["close"])));
        defs.push(args(def("priv", "PRI"), &["recipient", "message"]));
        defs.push(preset(args(def("ignore", "IGN"), &["character"]), "action", "add"));
        defs.push(preset(args(def("unignore", "IGN"), &["character"]), "action", "delete"));
        defs.push(args(def("makeroom", "CCR"), &["channel"]));
        defs.push(channel(args(def("invite", "CIU"), &["character"])));
        defs.push({
            let mut d = channel(def("roll", "RLL"));
            d.optional = vec!["dice".to_string()];
            d
        });
        defs.push(preset(args(def("report", "SFC"), &["report"]), "action", "report"));
        defs.push(def("uptime", "UPT"));

        // Channel staff.
        defs.push(tier(channel(args(def("kick", "CKU"), &["character"])), Moderator));
        defs.push(tier(channel(args(def("ban", "CBU"), &["character"])), Moderator));
        defs.push(tier(channel(args(def("unban", "CUB"), &["character"])), Moderator));
        defs.push(tier(channel(args(def("timeout", "CTU"), &["character", "length"])), Moderator));
        defs.push(tier(channel(args(def("setmode", "RMO"), &["mode"])), Moderator));
        defs.push(tier(channel(args(def("setdescription", "CDS"), &["description"])), Moderator));
        defs.push(tier(channel(alias(args(def("promote", "COA"), &["character"]), &["cop"])), Moderator));
        defs.push(tier(channel(alias(args(def("demote", "COR"), &["character"]), &["cdeop"])), Moderator));
        defs.push(tier(channel(args(def("setowner", "CSO"), &["character"])), Moderator));

        // Global staff.
        defs.push(tier(args(def("gkick", "KIK"), &["character"]), GlobalMod));
        defs.push(tier(alias(args(def("accountban", "ACB"), &["character"]), &["ab"]), GlobalMod));
        defs.push(tier(args(def("reward", "RWD"), &["character"]), GlobalMod));

        // Admins.
        defs.push(tier(args(def("gop", "AOP"), &["character"]), Admin));
        defs.push(tier(args(def("gdeop", "DOP"), &["character"]), Admin));
        defs.push(tier(args(def("broadcast", "BRO"), &["message"]), Admin));

        Self::from_defs(defs)
    }
}
