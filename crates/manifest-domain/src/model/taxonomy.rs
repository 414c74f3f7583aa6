//! Three-level status taxonomy (main -> sub -> sub-sub)
//!
//! Insertion order is kept for every level so option lists render in the
//! order they were created. On the wire it is a plain nested JSON object:
//! `{"Loading": {"Docked": ["Bay 3"]}}`.

use std::fmt;

use manifest_types::ValidationError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTaxonomy {
    mains: Vec<MainStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MainStatus {
    name: String,
    subs: Vec<SubStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SubStatus {
    name: String,
    sub_subs: Vec<String>,
}

impl StatusTaxonomy {
    pub fn is_empty(&self) -> bool {
        self.mains.is_empty()
    }

    pub fn main_names(&self) -> Vec<&str> {
        self.mains.iter().map(|m| m.name.as_str()).collect()
    }

    /// Sub options under a main; empty when the main is unknown
    pub fn sub_names(&self, main: &str) -> Vec<&str> {
        self.main(main)
            .map(|m| m.subs.iter().map(|s| s.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Sub-sub options under a main/sub; empty when either is unknown
    pub fn sub_sub_names(&self, main: &str, sub: &str) -> Vec<&str> {
        self.sub(main, sub)
            .map(|s| s.sub_subs.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn contains_main(&self, main: &str) -> bool {
        self.main(main).is_some()
    }

    pub fn contains_sub(&self, main: &str, sub: &str) -> bool {
        self.sub(main, sub).is_some()
    }

    pub fn contains_sub_sub(&self, main: &str, sub: &str, sub_sub: &str) -> bool {
        self.sub(main, sub)
            .map(|s| s.sub_subs.iter().any(|x| x == sub_sub))
            .unwrap_or(false)
    }

    /// Add a main status; returns false when it already exists
    pub fn add_main(&mut self, name: &str) -> Result<bool, ValidationError> {
        let name = non_empty(name)?;
        if self.contains_main(name) {
            return Ok(false);
        }
        self.mains.push(MainStatus {
            name: name.to_string(),
            subs: Vec::new(),
        });
        Ok(true)
    }

    /// Add a sub status under an existing main
    pub fn add_sub(&mut self, main: &str, name: &str) -> Result<bool, ValidationError> {
        let main = main.trim();
        if main.is_empty() {
            return Err(ValidationError::MissingMainStatus);
        }
        let name = non_empty(name)?;
        let entry = self
            .main_mut(main)
            .ok_or_else(|| ValidationError::UnknownStatusOption(main.to_string()))?;
        if entry.subs.iter().any(|s| s.name == name) {
            return Ok(false);
        }
        entry.subs.push(SubStatus {
            name: name.to_string(),
            sub_subs: Vec::new(),
        });
        Ok(true)
    }

    /// Add a sub-sub status under an existing main/sub
    pub fn add_sub_sub(&mut self, main: &str, sub: &str, name: &str) -> Result<bool, ValidationError> {
        let (main, sub) = (main.trim(), sub.trim());
        if main.is_empty() || sub.is_empty() {
            return Err(ValidationError::MissingSubStatus);
        }
        let name = non_empty(name)?;
        let entry = self
            .sub_mut(main, sub)
            .ok_or_else(|| ValidationError::UnknownStatusOption(sub.to_string()))?;
        if entry.sub_subs.iter().any(|x| x == name) {
            return Ok(false);
        }
        entry.sub_subs.push(name.to_string());
        Ok(true)
    }

    /// Delete a main and everything beneath it
    pub fn delete_main(&mut self, main: &str) -> bool {
        let before = self.mains.len();
        self.mains.retain(|m| m.name != main);
        self.mains.len() != before
    }

    /// Delete a sub and its sub-sub list
    pub fn delete_sub(&mut self, main: &str, sub: &str) -> bool {
        match self.main_mut(main) {
            Some(entry) => {
                let before = entry.subs.len();
                entry.subs.retain(|s| s.name != sub);
                entry.subs.len() != before
            }
            None => false,
        }
    }

    pub fn delete_sub_sub(&mut self, main: &str, sub: &str, sub_sub: &str) -> bool {
        match self.sub_mut(main, sub) {
            Some(entry) => {
                let before = entry.sub_subs.len();
                entry.sub_subs.retain(|x| x != sub_sub);
                entry.sub_subs.len() != before
            }
            None => false,
        }
    }

    fn main(&self, main: &str) -> Option<&MainStatus> {
        self.mains.iter().find(|m| m.name == main)
    }

    fn main_mut(&mut self, main: &str) -> Option<&mut MainStatus> {
        self.mains.iter_mut().find(|m| m.name == main)
    }

    fn sub(&self, main: &str, sub: &str) -> Option<&SubStatus> {
        self.main(main)?.subs.iter().find(|s| s.name == sub)
    }

    fn sub_mut(&mut self, main: &str, sub: &str) -> Option<&mut SubStatus> {
        self.main_mut(main)?.subs.iter_mut().find(|s| s.name == sub)
    }
}

fn non_empty(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(name)
    }
}

// --- serde: ordered nested objects ---

struct SubsRef<'a>(&'a [SubStatus]);

impl Serialize for SubsRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for sub in self.0 {
            map.serialize_entry(&sub.name, &sub.sub_subs)?;
        }
        map.end()
    }
}

impl Serialize for StatusTaxonomy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.mains.len()))?;
        for main in &self.mains {
            map.serialize_entry(&main.name, &SubsRef(&main.subs))?;
        }
        map.end()
    }
}

struct OrderedSubs(Vec<SubStatus>);

impl<'de> Deserialize<'de> for OrderedSubs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SubsVisitor;

        impl<'de> Visitor<'de> for SubsVisitor {
            type Value = OrderedSubs;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of sub status -> list of sub-sub statuses")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut subs: Vec<SubStatus> = Vec::new();
                while let Some((name, sub_subs)) =
                    access.next_entry::<String, Option<Vec<String>>>()?
                {
                    subs.retain(|s| s.name != name);
                    subs.push(SubStatus {
                        name,
                        sub_subs: sub_subs.unwrap_or_default(),
                    });
                }
                Ok(OrderedSubs(subs))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(OrderedSubs(Vec::new()))
            }
        }

        deserializer.deserialize_any(SubsVisitor)
    }
}

impl<'de> Deserialize<'de> for StatusTaxonomy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TaxonomyVisitor;

        impl<'de> Visitor<'de> for TaxonomyVisitor {
            type Value = StatusTaxonomy;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of main status -> sub statuses")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut mains: Vec<MainStatus> = Vec::new();
                while let Some((name, subs)) = access.next_entry::<String, OrderedSubs>()? {
                    mains.retain(|m| m.name != name);
                    mains.push(MainStatus { name, subs: subs.0 });
                }
                Ok(StatusTaxonomy { mains })
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(StatusTaxonomy::default())
            }
        }

        deserializer.deserialize_any(TaxonomyVisitor)
    }
}
