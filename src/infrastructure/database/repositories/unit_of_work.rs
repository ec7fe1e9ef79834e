//! SeaORM implementation of the transaction ports
//!
//! `SeaOrmTransactionManager` holds the connection pool and opens one
//! `DatabaseTransaction` per unit of work. `SeaOrmUnitOfWork` implements both
//! stores against that transaction. SeaORM rolls back a transaction that is
//! dropped without `commit`.

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, TransactionTrait,
};
use tracing::debug;

use super::{db_err, role_repository, user_repository};
use crate::domain::{
    AccessMode, DomainResult, Role, RoleStore, TransactionManager, UnitOfWork, User, UserStore,
};
use crate::shared::{Page, PageRequest};

/// Opens SeaORM transactions on a shared connection pool.
///
/// ```ignore
/// let tm = SeaOrmTransactionManager::new(db.clone());
/// let unit = tm.begin(AccessMode::ReadOnly).await?;
/// let user = unit.users().find_by_id(1).await?;
/// unit.commit().await?;
/// ```
#[derive(Clone)]
pub struct SeaOrmTransactionManager {
    db: DatabaseConnection,
}

impl SeaOrmTransactionManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionManager for SeaOrmTransactionManager {
    type Unit = SeaOrmUnitOfWork;

    async fn begin(&self, mode: AccessMode) -> DomainResult<SeaOrmUnitOfWork> {
        // SQLite has no per-transaction access mode and only logs a warning.
        let access_mode = match (mode, self.db.get_database_backend()) {
            (AccessMode::ReadOnly, DbBackend::Postgres | DbBackend::MySql) => {
                Some(sea_orm::AccessMode::ReadOnly)
            }
            _ => None,
        };

        let txn = self
            .db
            .begin_with_config(None, access_mode)
            .await
            .map_err(db_err)?;

        debug!(?mode, "Transaction started");
        Ok(SeaOrmUnitOfWork { txn })
    }
}

pub struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    fn users(&self) -> &dyn UserStore {
        self
    }

    fn roles(&self) -> &dyn RoleStore {
        self
    }

    async fn commit(self) -> DomainResult<()> {
        self.txn.commit().await.map_err(db_err)
    }

    async fn rollback(self) -> DomainResult<()> {
        self.txn.rollback().await.map_err(db_err)
    }
}

#[async_trait]
impl UserStore for SeaOrmUnitOfWork {
    async fn find_all(&self) -> DomainResult<Vec<User>> {
        user_repository::find_all(&self.txn).await
    }

    async fn find_page(&self, request: &PageRequest) -> DomainResult<Page<User>> {
        user_repository::find_page(&self.txn, request).await
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        user_repository::find_by_id(&self.txn, id).await
    }

    async fn save(&self, user: User) -> DomainResult<User> {
        user_repository::save(&self.txn, user).await
    }

    async fn delete_by_id(&self, id: i64) -> DomainResult<()> {
        user_repository::delete_by_id(&self.txn, id).await
    }
}

#[async_trait]
impl RoleStore for SeaOrmUnitOfWork {
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Role>> {
        role_repository::find_by_name(&self.txn, name).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sea_orm::{ConnectOptions, Database, EntityTrait, PaginatorTrait};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::application::identity::UserService;
    use crate::domain::{DomainError, UserRequest, ROLE_ADMIN, ROLE_USER};
    use crate::infrastructure::crypto::BcryptPasswordHasher;
    use crate::infrastructure::database::entities::{role, user_role};
    use crate::infrastructure::database::migrator::Migrator;
    use crate::shared::{SortDirection, SortField};

    async fn migrated_db() -> DatabaseConnection {
        // One connection: every handle to `sqlite::memory:` is a separate database.
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn service(
        db: &DatabaseConnection,
    ) -> UserService<SeaOrmTransactionManager, BcryptPasswordHasher> {
        UserService::new(
            Arc::new(SeaOrmTransactionManager::new(db.clone())),
            Arc::new(BcryptPasswordHasher::new(4)),
        )
    }

    fn ana() -> User {
        User::new("Ana", "Lopez", "ana", "ana@example.com", "pw123")
    }

    #[tokio::test]
    async fn migrations_seed_roles() {
        let db = migrated_db().await;
        let roles = role::Entity::find().all(&db).await.unwrap();
        let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec![ROLE_USER, ROLE_ADMIN]);
    }

    #[tokio::test]
    async fn save_update_delete_round_trip() {
        let db = migrated_db().await;
        let service = service(&db);

        let saved = service.save(ana()).await.unwrap();
        assert_eq!(saved.id, Some(1));
        assert_ne!(saved.password, "pw123");
        assert!(bcrypt::verify("pw123", &saved.password).unwrap());
        assert_eq!(saved.role_names(), vec![ROLE_USER]);

        let request = UserRequest {
            name: "Ana2".into(),
            lastname: "Lopez".into(),
            email: "ana@example.com".into(),
            username: "ana".into(),
            admin: true,
        };
        let updated = service.update(&request, 1).await.unwrap().unwrap();
        assert_eq!(updated.name, "Ana2");
        assert_eq!(updated.role_names(), vec![ROLE_USER, ROLE_ADMIN]);
        assert_eq!(updated.password, saved.password);

        let reloaded = service.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(reloaded.role_names(), vec![ROLE_USER, ROLE_ADMIN]);
        assert!(reloaded.admin);
        assert_eq!(reloaded.password, saved.password);

        service.delete_by_id(1).await.unwrap();
        assert!(service.find_by_id(1).await.unwrap().is_none());
        assert_eq!(user_role::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_replaces_every_profile_field() {
        let db = migrated_db().await;
        let service = service(&db);
        let saved = service.save(ana()).await.unwrap();

        let request = UserRequest {
            name: "Anna".into(),
            lastname: "Garcia".into(),
            email: "anna@example.org".into(),
            username: "anna".into(),
            admin: false,
        };
        service.update(&request, 1).await.unwrap().unwrap();

        let reloaded = service.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(reloaded.name, "Anna");
        assert_eq!(reloaded.lastname, "Garcia");
        assert_eq!(reloaded.email, "anna@example.org");
        assert_eq!(reloaded.username, "anna");
        assert_eq!(reloaded.password, saved.password);
        assert_eq!(reloaded.role_names(), vec![ROLE_USER]);
    }

    #[tokio::test]
    async fn update_onto_taken_email_rolls_back() {
        let db = migrated_db().await;
        let service = service(&db);
        service.save(ana()).await.unwrap();
        service
            .save(User::new("Bob", "Smith", "bob", "bob@example.com", "pw"))
            .await
            .unwrap();

        let request = UserRequest {
            name: "Ana2".into(),
            lastname: "Lopez2".into(),
            email: "bob@example.com".into(),
            username: "ana".into(),
            admin: true,
        };
        let err = service.update(&request, 1).await.unwrap_err();
        assert!(err.is_conflict(), "unexpected error: {err}");

        let reloaded = service.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(reloaded.name, "Ana");
        assert_eq!(reloaded.lastname, "Lopez");
        assert_eq!(reloaded.email, "ana@example.com");
        assert_eq!(reloaded.role_names(), vec![ROLE_USER]);
        assert_eq!(user_role::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn update_missing_id_writes_nothing() {
        let db = migrated_db().await;
        let service = service(&db);

        let result = service.update(&UserRequest::default(), 7).await.unwrap();

        assert!(result.is_none());
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict_and_rolls_back() {
        let db = migrated_db().await;
        let service = service(&db);
        service.save(ana()).await.unwrap();

        let duplicate = User::new("Other", "Person", "ana", "other@example.com", "pw");
        let err = service.save(duplicate).await.unwrap_err();

        assert!(err.is_conflict(), "unexpected error: {err}");
        assert_eq!(service.find_all().await.unwrap().len(), 1);
        assert_eq!(user_role::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn pages_are_sorted_and_bounded() {
        let db = migrated_db().await;
        let service = service(&db);
        for name in ["dora", "ana", "carl", "bob", "eve"] {
            let user = User::new(name, "X", name, format!("{}@example.com", name), "pw");
            service.save(user).await.unwrap();
        }

        let request = PageRequest::of(0, 2).with_sort(SortField::Username, SortDirection::Asc);
        let page = service.find_page(&request).await.unwrap();
        let names: Vec<_> = page.content.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["ana", "bob"]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.content.iter().all(|u| u.role_names() == vec![ROLE_USER]));

        let beyond = service.find_page(&PageRequest::of(5, 2)).await.unwrap();
        assert!(beyond.content.is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_id_is_ok() {
        let db = migrated_db().await;
        service(&db).delete_by_id(99).await.unwrap();
    }

    #[tokio::test]
    async fn dropped_unit_rolls_back() {
        let db = migrated_db().await;
        let tm = SeaOrmTransactionManager::new(db.clone());
        {
            let unit = tm.begin(AccessMode::ReadWrite).await.unwrap();
            unit.users().save(ana()).await.unwrap();
        }

        let unit = tm.begin(AccessMode::ReadOnly).await.unwrap();
        assert!(unit.users().find_all().await.unwrap().is_empty());
        unit.commit().await.unwrap();
    }

    #[tokio::test]
    async fn saving_unknown_id_is_not_found() {
        let db = migrated_db().await;
        let tm = SeaOrmTransactionManager::new(db);
        let unit = tm.begin(AccessMode::ReadWrite).await.unwrap();

        let mut ghost = ana();
        ghost.id = Some(42);
        let err = unit.users().save(ghost).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        unit.rollback().await.unwrap();
    }
}
