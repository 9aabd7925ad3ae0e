//! Key/value site settings, stored per module in the `module_settings` table.

use crate::prelude::*;

/// Name under which this service's settings are stored.
pub(crate) const MODULE: &str = "legal_notice";

/// A generic get/set preference store.
///
/// Everything that reads or writes site settings takes one of these instead
/// of touching the database, so the logic on top works on plain snapshots.
pub(crate) trait PreferenceStore {
    fn preference(&self, name: &str) -> Option<&str>;
    fn set_preference(&mut self, name: &str, value: &str);

    fn preference_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.preference(name).unwrap_or(default)
    }

    /// Flags are stored as `"0"`/`"1"`; anything but `"0"` counts as on.
    fn flag(&self, name: &str) -> bool {
        self.preference_or(name, "0") != "0"
    }
}

/// A snapshot of all of a module's settings, loaded once per request.
///
/// Writes are kept in memory and only reach the database through [`Preferences::save`].
#[derive(Debug, Default, Clone)]
pub(crate) struct Preferences {
    values: HashMap<String, String>,
    changed: BTreeSet<String>,
}

impl Preferences {
    pub(crate) async fn load(transaction: &mut Transaction<'_, Postgres>, module: &str) -> sqlx::Result<Self> {
        let values = sqlx::query_as::<_, (String, String)>("SELECT name, value FROM module_settings WHERE module = $1")
            .bind(module)
            .fetch_all(&mut **transaction).await?
            .into_iter()
            .collect();
        Ok(Self { values, changed: BTreeSet::default() })
    }

    /// Writes every changed setting back. Concurrent saves are not coordinated: last write wins.
    pub(crate) async fn save(&mut self, transaction: &mut Transaction<'_, Postgres>, module: &str) -> sqlx::Result<()> {
        for name in std::mem::take(&mut self.changed) {
            let value = &self.values[&name];
            sqlx::query("INSERT INTO module_settings (module, name, value) VALUES ($1, $2, $3) ON CONFLICT (module, name) DO UPDATE SET value = EXCLUDED.value")
                .bind(module)
                .bind(&name)
                .bind(value)
                .execute(&mut **transaction).await?;
        }
        Ok(())
    }

    pub(crate) fn is_changed(&self) -> bool {
        !self.changed.is_empty()
    }
}

impl PreferenceStore for Preferences {
    fn preference(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    fn set_preference(&mut self, name: &str, value: &str) {
        if self.values.get(name).is_none_or(|old| old != value) {
            self.values.insert(name.to_owned(), value.to_owned());
            self.changed.insert(name.to_owned());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Preferences {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect(),
            changed: BTreeSet::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_settings() {
        let prefs = Preferences::from_iter([("street", "Hauptstraße 1"), ("showGravatar", "0"), ("showCopyRight", "1")]);
        assert_eq!(prefs.preference_or("street", ""), "Hauptstraße 1");
        assert_eq!(prefs.preference_or("city", "nowhere"), "nowhere");
        assert!(!prefs.flag("showGravatar"));
        assert!(prefs.flag("showCopyRight"));
        assert!(!prefs.flag("showAdministrators"));
    }

    #[test]
    fn only_real_changes_are_tracked() {
        let mut prefs = Preferences::from_iter([("phone", "123")]);
        prefs.set_preference("phone", "123");
        assert!(!prefs.is_changed());
        prefs.set_preference("phone", "456");
        prefs.set_preference("fax", "");
        assert!(prefs.is_changed());
        assert_eq!(prefs.changed.iter().collect_vec(), ["fax", "phone"]);
        assert_eq!(prefs.preference("fax"), Some(""));
    }
}
