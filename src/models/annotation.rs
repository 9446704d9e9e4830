use crate::models::mod_dto::ModRef;
use crate::utils::ordered_map::OrderedMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Named display buckets, in display order.
pub type Groups = OrderedMap<String, Vec<ModRef>>;

pub type Comments = BTreeMap<ModRef, String>;

/// Target of a color annotation. Packages and groups share one file on disk, so
/// a raw key is matched against the known groups first, then the known packages;
/// see [`AnnotationKey::resolve`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnnotationKey {
    Package(ModRef),
    Group(String),
}

impl AnnotationKey {
    /// Resolves a raw key from the colors file. A group of that name wins over a
    /// package; keys matching neither fall back to [`AnnotationKey::parse`].
    pub fn resolve(raw: &str, groups: &Groups, is_package: impl Fn(&ModRef) -> bool) -> Self {
        if groups.contains_key(&raw.to_string()) {
            return AnnotationKey::Group(raw.to_string());
        }
        let r = ModRef::new(raw);
        if is_package(&r) {
            return AnnotationKey::Package(r);
        }
        Self::parse(raw)
    }

    /// Guesses from the name alone: a `.mod` extension means a package.
    pub fn parse(raw: &str) -> Self {
        let r = ModRef::new(raw);
        if r.is_descriptor() {
            AnnotationKey::Package(r)
        } else {
            AnnotationKey::Group(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AnnotationKey::Package(r) => r.as_str(),
            AnnotationKey::Group(name) => name,
        }
    }
}

impl Serialize for AnnotationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnnotationKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(AnnotationKey::parse(&raw))
    }
}

/// Display colors, e.g. `#ff8800`. Purely cosmetic.
pub type Colors = BTreeMap<AnnotationKey, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_file_splits_packages_and_groups() {
        let raw = r##"{"123.mod": "#ff0000", "Graphics": "#00ff00"}"##;
        let colors: Colors = serde_json::from_str(raw).unwrap();
        assert_eq!(
            colors.get(&AnnotationKey::Package(ModRef::new("123.mod"))),
            Some(&"#ff0000".to_string())
        );
        assert_eq!(
            colors.get(&AnnotationKey::Group("Graphics".into())),
            Some(&"#00ff00".to_string())
        );
    }

    #[test]
    fn test_resolve_prefers_known_groups() {
        let groups: Groups = [("Patches.mod".to_string(), vec![])].into_iter().collect();
        let known = |r: &ModRef| r.as_str() == "123.mod";

        assert_eq!(
            AnnotationKey::resolve("Patches.mod", &groups, known),
            AnnotationKey::Group("Patches.mod".into())
        );
        assert_eq!(
            AnnotationKey::resolve("123.mod", &groups, known),
            AnnotationKey::Package(ModRef::new("123.mod"))
        );
        assert_eq!(
            AnnotationKey::resolve("Later.mod", &groups, known),
            AnnotationKey::Package(ModRef::new("Later.mod"))
        );
        assert_eq!(
            AnnotationKey::resolve("Ui", &groups, known),
            AnnotationKey::Group("Ui".into())
        );
    }
}
