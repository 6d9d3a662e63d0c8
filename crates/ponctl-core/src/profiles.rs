// ── Profile collaborator surface ──
//
// One generic client surface for every named profile table: list, get
// by name, create, delete. The device exposes ~15 structurally
// identical profile kinds; the generic methods cover any of them given
// a wire type implementing `NamedEntry`.

use serde::Serialize;

use ponctl_api::restconf::models::NamedEntry;

use crate::error::CoreError;
use crate::session::OltSession;

impl OltSession {
    /// List every entry of profile kind `K`.
    pub async fn profiles<K: NamedEntry>(&self) -> Result<Vec<K>, CoreError> {
        Ok(self.client.get_table().await?)
    }

    /// Fetch one profile of kind `K` by name.
    pub async fn profile_by_name<K: NamedEntry>(&self, name: &str) -> Result<K, CoreError> {
        if name.is_empty() {
            return Err(CoreError::InvalidInput {
                message: "profile name must not be empty".to_owned(),
            });
        }
        self.profiles::<K>()
            .await?
            .into_iter()
            .find(|profile| profile.name() == name)
            .ok_or_else(|| CoreError::NotFound {
                what: K::KIND,
                identifier: name.to_owned(),
            })
    }

    /// Create a profile of kind `K`, refusing to overwrite an existing
    /// name.
    pub async fn create_profile<K: NamedEntry + Serialize>(
        &self,
        profile: &K,
    ) -> Result<(), CoreError> {
        if profile.name().is_empty() {
            return Err(CoreError::InvalidInput {
                message: "profile name must not be empty".to_owned(),
            });
        }
        match self.profile_by_name::<K>(profile.name()).await {
            Ok(_) => {
                return Err(CoreError::AlreadyExists {
                    what: K::KIND,
                    identifier: profile.name().to_owned(),
                });
            }
            Err(CoreError::NotFound { .. }) => {}
            Err(other) => return Err(other),
        }
        Ok(self.client.post_entry(profile.name(), profile).await?)
    }

    /// Delete a profile of kind `K` by name. Entries the device reports
    /// as in use refuse deletion.
    pub async fn delete_profile<K: NamedEntry>(&self, name: &str) -> Result<(), CoreError> {
        let profile = self.profile_by_name::<K>(name).await?;
        if profile.in_use() {
            return Err(CoreError::ProfileInUse {
                name: name.to_owned(),
            });
        }
        Ok(self.client.delete_entry::<K>(name).await?)
    }
}
