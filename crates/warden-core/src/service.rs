//! Identity flows

use std::sync::Arc;
use tracing::{debug, info, warn};
use warden_auth::{CredentialHasher, JwtManager};
use warden_db::{DbError, NewRole, NewUser, Role, RoleStore, User, UserStore};

use crate::config::IdentityConfig;
use crate::error::CoreError;
use crate::request::{CreateRoleRequest, LoginRequest, RegisterRequest};
use crate::validation::ValidationErrors;

/// Hashed once at startup and verified against when a login names an
/// unknown user, so both failure paths pay the same hashing cost.
const TIMING_EQUALIZER: &str = "warden-timing-equalizer";

/// Registration, login and role creation over abstract stores
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    hasher: CredentialHasher,
    jwt: Arc<JwtManager>,
    dummy_digest: String,
}

impl IdentityService {
    /// Create a new identity service
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        config: &IdentityConfig,
    ) -> Result<Self, CoreError> {
        let hasher = CredentialHasher::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
        )
        .map_err(|e| CoreError::Config(e.to_string()))?;

        let dummy_digest = hasher
            .hash(TIMING_EQUALIZER)
            .map_err(|e| CoreError::Hashing(e.to_string()))?;

        info!(
            "Initializing identity service (token ttl: {}s, argon2 m={} t={} p={})",
            config.token_ttl.num_seconds(),
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism
        );

        Ok(Self {
            users,
            roles,
            hasher,
            jwt: Arc::new(JwtManager::new(&config.jwt_secret, config.token_ttl)),
            dummy_digest,
        })
    }

    /// Token issuer shared with the HTTP layer for bearer validation
    pub fn jwt(&self) -> Arc<JwtManager> {
        self.jwt.clone()
    }

    /// Register a new user
    ///
    /// The username pre-check only avoids hashing for an obvious duplicate;
    /// the store's unique constraints decide concurrent registrations.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, CoreError> {
        request.validate().map_err(CoreError::Validation)?;

        debug!("Registering user: {}", request.username);

        match self.users.get_user_by_username(&request.username).await {
            Ok(_) => return Err(CoreError::DuplicateIdentity("username".to_string())),
            Err(DbError::NotFound(_)) => {}
            Err(e) => return Err(CoreError::Persistence(e)),
        }

        let RegisterRequest {
            fullname,
            username,
            email,
            phone,
            password,
            role_id,
        } = request;

        let password_hash = self.hash_password(password).await?;

        let user = self
            .users
            .create_user(NewUser {
                username,
                fullname,
                phone,
                email,
                password_hash,
                gender: None,
                bio: None,
                picture_id: None,
                role_id,
            })
            .await
            .map_err(|e| match e {
                DbError::Duplicate(field) => CoreError::DuplicateIdentity(field),
                DbError::InvalidReference(_) => {
                    let mut errors = ValidationErrors::new();
                    errors.add("role_id", "role does not exist");
                    CoreError::Validation(errors)
                }
                other => CoreError::Persistence(other),
            })?;

        info!("Registered user {} (id {})", user.username, user.id);
        Ok(user)
    }

    /// Verify credentials and issue a token
    ///
    /// An unknown username, a store failure and a wrong password all end in
    /// [`CoreError::InvalidCredentials`].
    pub async fn login(&self, request: LoginRequest) -> Result<String, CoreError> {
        request.validate().map_err(CoreError::Validation)?;

        debug!("Login attempt for user: {}", request.username);

        let user = match self.users.get_user_by_username(&request.username).await {
            Ok(user) => Some(user),
            Err(DbError::NotFound(_)) => None,
            Err(e) => {
                warn!("User lookup failed during login: {}", e);
                None
            }
        };

        // Always verify, against a dummy digest if there is no user
        let digest = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| self.dummy_digest.clone());
        let password_valid = self.verify_password(digest, request.password).await;

        let user = match (user, password_valid) {
            (Some(u), true) => u,
            _ => return Err(CoreError::InvalidCredentials),
        };

        let token = self
            .jwt
            .generate_token(user.id, user.role_id)
            .map_err(|e| CoreError::Signing(e.to_string()))?;

        info!("User {} logged in successfully", user.username);
        Ok(token)
    }

    /// Create a role
    pub async fn create_role(&self, request: CreateRoleRequest) -> Result<Role, CoreError> {
        request.validate().map_err(CoreError::Validation)?;

        match self.roles.get_role_by_name(&request.name).await {
            Ok(_) => return Err(CoreError::DuplicateRole(request.name)),
            Err(DbError::NotFound(_)) => {}
            Err(e) => return Err(CoreError::Persistence(e)),
        }

        let name = request.name.clone();
        let role = self
            .roles
            .create_role(NewRole {
                name: request.name,
                desc: request.desc,
            })
            .await
            .map_err(|e| match e {
                DbError::Duplicate(_) => CoreError::DuplicateRole(name),
                other => CoreError::Persistence(other),
            })?;

        info!("Created role {} (id {})", role.name, role.id);
        Ok(role)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i64) -> Result<User, CoreError> {
        self.users.get_user_by_id(id).await.map_err(|e| match e {
            DbError::NotFound(msg) => CoreError::NotFound(msg),
            other => CoreError::Persistence(other),
        })
    }

    /// Round-trip to the role store, reporting whether any role exists
    pub async fn check_store(&self) -> Result<bool, CoreError> {
        Ok(self.roles.has_roles().await?)
    }

    async fn hash_password(&self, password: String) -> Result<String, CoreError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| CoreError::Hashing(format!("Task join error: {}", e)))?
            .map_err(|e| CoreError::Hashing(e.to_string()))
    }

    async fn verify_password(&self, digest: String, candidate: String) -> bool {
        let hasher = self.hasher.clone();
        match tokio::task::spawn_blocking(move || hasher.verify(&digest, &candidate)).await {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Password verification task failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use warden_db::MemoryStore;

    fn test_config() -> IdentityConfig {
        IdentityConfig {
            jwt_secret: b"test-secret".to_vec(),
            token_ttl: Duration::hours(24),
            hash_memory_kib: 1024,
            hash_iterations: 1,
            hash_parallelism: 1,
        }
    }

    async fn service_with_role() -> (IdentityService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store
            .create_role(NewRole {
                name: "member".to_string(),
                desc: "Regular member".to_string(),
            })
            .await
            .unwrap();
        let service = IdentityService::new(store.clone(), store.clone(), &test_config()).unwrap();
        (service, store)
    }

    fn alice() -> RegisterRequest {
        RegisterRequest {
            fullname: "Alice Liddell".to_string(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            phone: "12345678901".to_string(),
            password: "password1".to_string(),
            role_id: 1,
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_scenario() {
        let (service, store) = service_with_role().await;

        let user = service.register(alice()).await.unwrap();
        assert_ne!(user.password_hash, "password1");
        assert!(user.password_hash.starts_with("$argon2id$"));

        let token = service.login(login("alice", "password1")).await.unwrap();
        assert!(!token.is_empty());
        let claims = service.jwt().validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role_id, 1);

        let err = service.login(login("alice", "wrong")).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidCredentials));

        let err = service.register(alice()).await.unwrap_err();
        assert!(matches!(err, CoreError::DuplicateIdentity(ref f) if f == "username"));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_alike() {
        let (service, _store) = service_with_role().await;
        service.register(alice()).await.unwrap();

        let wrong_password = service.login(login("alice", "password2")).await.unwrap_err();
        let unknown_user = service.login(login("mallory", "password1")).await.unwrap_err();

        assert!(matches!(wrong_password, CoreError::InvalidCredentials));
        assert!(matches!(unknown_user, CoreError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_register_reports_all_invalid_fields() {
        let (service, store) = service_with_role().await;
        let request = RegisterRequest {
            fullname: "Holycan".to_string(),
            username: "holycan".to_string(),
            email: "invalid".to_string(),
            phone: "rama".to_string(),
            password: "12345678!".to_string(),
            role_id: 0,
        };

        match service.register(request).await.unwrap_err() {
            CoreError::Validation(errors) => {
                assert_eq!(errors.fields(), vec!["email", "phone", "role_id"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_maps_to_duplicate_identity() {
        let (service, store) = service_with_role().await;
        service.register(alice()).await.unwrap();

        let mut bob = alice();
        bob.username = "bob".to_string();
        let err = service.register(bob).await.unwrap_err();
        assert!(matches!(err, CoreError::DuplicateIdentity(ref f) if f == "email"));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let (service, store) = service_with_role().await;
        let mut request = alice();
        request.role_id = 42;

        match service.register(request).await.unwrap_err() {
            CoreError::Validation(errors) => assert_eq!(errors.fields(), vec!["role_id"]),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(store.user_count(), 0);
    }

    /// A store whose lookups never see existing users, as if every
    /// registration raced another one past the pre-check.
    struct BlindStore(Arc<MemoryStore>);

    #[async_trait]
    impl UserStore for BlindStore {
        async fn get_user_by_username(&self, username: &str) -> Result<User, DbError> {
            Err(DbError::NotFound(username.to_string()))
        }

        async fn get_user_by_id(&self, id: i64) -> Result<User, DbError> {
            self.0.get_user_by_id(id).await
        }

        async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
            self.0.create_user(user).await
        }
    }

    #[tokio::test]
    async fn test_lost_race_maps_to_duplicate_identity() {
        let (_, store) = service_with_role().await;
        let blind = Arc::new(BlindStore(store.clone()));
        let service = IdentityService::new(blind, store.clone(), &test_config()).unwrap();

        service.register(alice()).await.unwrap();
        let err = service.register(alice()).await.unwrap_err();

        assert!(matches!(err, CoreError::DuplicateIdentity(ref f) if f == "username"));
        assert_eq!(store.user_count(), 1);
    }

    /// A store whose lookups fail as if the connection pool were exhausted.
    /// Inserts still reach the wrapped store so tests can tell whether one
    /// was attempted.
    struct UnavailableStore(Arc<MemoryStore>);

    fn unavailable() -> DbError {
        DbError::Connection(sqlx::Error::PoolTimedOut)
    }

    #[async_trait]
    impl UserStore for UnavailableStore {
        async fn get_user_by_username(&self, _username: &str) -> Result<User, DbError> {
            Err(unavailable())
        }

        async fn get_user_by_id(&self, _id: i64) -> Result<User, DbError> {
            Err(unavailable())
        }

        async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
            self.0.create_user(user).await
        }
    }

    #[async_trait]
    impl RoleStore for UnavailableStore {
        async fn get_role_by_name(&self, _name: &str) -> Result<Role, DbError> {
            Err(unavailable())
        }

        async fn get_role_by_id(&self, _id: i64) -> Result<Role, DbError> {
            Err(unavailable())
        }

        async fn create_role(&self, _role: NewRole) -> Result<Role, DbError> {
            Err(unavailable())
        }

        async fn has_roles(&self) -> Result<bool, DbError> {
            Err(unavailable())
        }
    }

    #[tokio::test]
    async fn test_login_store_failure_is_invalid_credentials() {
        let (healthy, store) = service_with_role().await;
        let down = Arc::new(UnavailableStore(store.clone()));
        let service = IdentityService::new(down, store, &test_config()).unwrap();

        let err = service.login(login("alice", "password1")).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidCredentials));

        let unknown_user = healthy.login(login("mallory", "password1")).await.unwrap_err();
        assert_eq!(err.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_register_store_failure_is_persistence() {
        let (_, store) = service_with_role().await;
        let down = Arc::new(UnavailableStore(store.clone()));
        let service = IdentityService::new(down, store.clone(), &test_config()).unwrap();

        let err = service.register(alice()).await.unwrap_err();
        assert!(matches!(err, CoreError::Persistence(DbError::Connection(_))));
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_check_store() {
        let (service, store) = service_with_role().await;
        assert!(service.check_store().await.unwrap());

        let down = Arc::new(UnavailableStore(store.clone()));
        let service = IdentityService::new(store, down, &test_config()).unwrap();
        assert!(matches!(
            service.check_store().await,
            Err(CoreError::Persistence(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_registrations_create_one_user() {
        let (service, store) = service_with_role().await;
        let service = Arc::new(service);

        let first = tokio::spawn({
            let service = service.clone();
            async move { service.register(alice()).await }
        });
        let second = tokio::spawn({
            let service = service.clone();
            async move { service.register(alice()).await }
        });

        let results = [first.await.unwrap(), second.await.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(CoreError::DuplicateIdentity(_)))));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_create_role() {
        let (service, store) = service_with_role().await;

        let role = service
            .create_role(CreateRoleRequest {
                name: "admin".to_string(),
                desc: "Administrators".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(store.get_role_by_name("admin").await.unwrap(), role);
        assert_eq!(store.get_role_by_id(role.id).await.unwrap(), role);

        let err = service
            .create_role(CreateRoleRequest {
                name: "admin".to_string(),
                desc: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateRole(ref n) if n == "admin"));
    }

    #[tokio::test]
    async fn test_get_user() {
        let (service, _store) = service_with_role().await;
        let user = service.register(alice()).await.unwrap();

        assert_eq!(service.get_user(user.id).await.unwrap().username, "alice");
        assert!(matches!(
            service.get_user(user.id + 1).await,
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_distinct_secrets_do_not_share_tokens() {
        let (service, store) = service_with_role().await;
        service.register(alice()).await.unwrap();
        let token = service.login(login("alice", "password1")).await.unwrap();

        let mut other_config = test_config();
        other_config.jwt_secret = b"another-secret".to_vec();
        let other = IdentityService::new(store.clone(), store, &other_config).unwrap();

        assert!(other.jwt().validate_token(&token).is_err());
    }
}
