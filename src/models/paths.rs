use camino::{Utf8Path, Utf8PathBuf};

/// Extension of the per-package descriptor files in the mods directory.
pub const DESCRIPTOR_EXTENSION: &str = "mod";

/// Prefix the game expects in front of a descriptor name inside the load order.
pub const LOAD_ORDER_PREFIX: &str = "mod/";

/// First path segment of every localisation file inside a package folder.
pub const LOCALIZATION_ROOT: &str = "localization";

/// Metadata files every package ships; overlaps on these are never conflicts.
pub const IGNORED_FILE_NAMES: [&str; 4] = [
    "descriptor.mod",
    "thumbnail.png",
    "thumbnail.ico",
    "Steam desc.txt",
];

macro_rules! define_paths {
    ($name:ident { $($field:ident : $default:expr),* $(,)? }) => {
        #[derive(Clone, Debug)]
        pub struct $name {
            $(pub $field: Utf8PathBuf,)*
        }

        impl $name {
            pub fn to_absolute(mut self, base: &Utf8Path) -> Self {
                $(self.$field = base.join(self.$field);)*
                self
            }

            pub fn new(base: &Utf8Path) -> Self {
                Self::default().to_absolute(base)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default.into(),)*
                }
            }
        }
    };
}

// Side files the manager keeps next to the descriptors.
define_paths!(ModsDirRules {
    comments: "comments.json",
    groups: "groups.json",
    colors: "mod_colors.json",
    working_state: "temp_mods.json",
    staging: ".staging",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_are_joined_onto_base() {
        let rules = ModsDirRules::new(Utf8Path::new("/games/ck3/mod"));
        assert_eq!(rules.working_state, "/games/ck3/mod/temp_mods.json");
        assert_eq!(rules.staging, "/games/ck3/mod/.staging");
    }
}
