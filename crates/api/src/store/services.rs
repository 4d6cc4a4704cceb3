//! Service catalog repository.

use skybook_core::ServiceId;

use super::{RepositoryError, Table};
use crate::models::{NewService, Service, ServicePatch};

/// Repository for service records.
pub struct ServiceRepository<'a> {
    table: &'a Table<ServiceId, Service>,
}

impl<'a> ServiceRepository<'a> {
    /// Create a new service repository.
    #[must_use]
    pub const fn new(table: &'a Table<ServiceId, Service>) -> Self {
        Self { table }
    }

    /// Services shown in the public catalog.
    pub async fn list_active(&self) -> Vec<Service> {
        self.table.filter(|service| service.is_active).await
    }

    /// Every service, active or not.
    pub async fn list_all(&self) -> Vec<Service> {
        self.table.list().await
    }

    /// Get a service by ID, including inactive ones.
    pub async fn get_by_id(&self, id: ServiceId) -> Option<Service> {
        self.table.get(id).await
    }

    /// Add a service to the catalog.
    pub async fn create(&self, new: NewService) -> Service {
        self.table
            .insert_with(|id| Service {
                id,
                name: new.name,
                description: new.description,
                price_per_hour: new.price_per_hour,
                icon: new.icon,
                color: new.color,
                is_active: new.is_active,
            })
            .await
    }

    /// Merge `patch` into the service.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the service does not exist.
    pub async fn update(
        &self,
        id: ServiceId,
        patch: ServicePatch,
    ) -> Result<Service, RepositoryError> {
        self.table
            .update(id, |service| patch.apply(service))
            .await
            .ok_or(RepositoryError::NotFound)
    }

    /// Remove a service. Bookings that reference it are kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the service does not exist.
    pub async fn delete(&self, id: ServiceId) -> Result<(), RepositoryError> {
        if self.table.remove(id).await {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_service(name: &str, is_active: bool) -> NewService {
        NewService {
            name: name.to_owned(),
            description: "Aerial work".to_owned(),
            price_per_hour: "100.00".parse().unwrap(),
            icon: "fas fa-video".to_owned(),
            color: "from-red-500 to-pink-500".to_owned(),
            is_active,
        }
    }

    #[tokio::test]
    async fn test_list_active_hides_inactive() {
        let table = Table::new();
        let repo = ServiceRepository::new(&table);
        repo.create(new_service("Videography", true)).await;
        let hidden = repo.create(new_service("Mapping", false)).await;

        let active = repo.list_active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Videography");
        assert_eq!(repo.list_all().await.len(), 2);
        assert!(repo.get_by_id(hidden.id).await.is_some());
    }

    #[tokio::test]
    async fn test_delete_then_create_uses_fresh_id() {
        let table = Table::new();
        let repo = ServiceRepository::new(&table);
        let first = repo.create(new_service("Videography", true)).await;
        repo.delete(first.id).await.unwrap();

        assert!(matches!(
            repo.delete(first.id).await,
            Err(RepositoryError::NotFound)
        ));
        let second = repo.create(new_service("Photography", true)).await;
        assert_eq!(second.id, ServiceId::new(2));
    }
}
