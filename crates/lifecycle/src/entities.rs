//! Entity resolution: the admin and client every project needs.
//!
//! Runs inside the caller's transaction. Creation uses
//! `INSERT .. ON CONFLICT DO NOTHING` and re-queries when the insert loses a
//! race, so concurrent submissions converge on one row instead of failing.

use intake_core::error::CoreError;
use intake_core::roles::{self, ROLE_ADMIN};
use intake_core::types::DbId;
use intake_db::models::client::{Client, CreateClient};
use intake_db::models::user::{CreateUser, User};
use intake_db::repositories::{ClientRepo, UserRepo};
use sqlx::PgConnection;

use crate::error::LifecycleResult;

// ---------------------------------------------------------------------------
// BootstrapConfig
// ---------------------------------------------------------------------------

/// Identity of the records synthesized on first use.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub fallback_admin_email: String,
    pub fallback_admin_first_name: String,
    pub fallback_admin_last_name: String,
    pub default_client_name: String,
    pub default_client_contact: String,
    pub default_client_email: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            fallback_admin_email: "admin@finley.com".into(),
            fallback_admin_first_name: "Admin".into(),
            fallback_admin_last_name: "User".into(),
            default_client_name: "Acme Corp".into(),
            default_client_contact: "Default Contact".into(),
            default_client_email: "contact@acme.com".into(),
        }
    }
}

impl BootstrapConfig {
    /// Load from environment variables, falling back to [`Default`] values.
    ///
    /// | Variable                    | Default            |
    /// |-----------------------------|--------------------|
    /// | `FALLBACK_ADMIN_EMAIL`      | `admin@finley.com` |
    /// | `FALLBACK_ADMIN_FIRST_NAME` | `Admin`            |
    /// | `FALLBACK_ADMIN_LAST_NAME`  | `User`             |
    /// | `DEFAULT_CLIENT_NAME`       | `Acme Corp`        |
    /// | `DEFAULT_CLIENT_CONTACT`    | `Default Contact`  |
    /// | `DEFAULT_CLIENT_EMAIL`      | `contact@acme.com` |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str, fallback: String| std::env::var(name).unwrap_or(fallback);
        Self {
            fallback_admin_email: var("FALLBACK_ADMIN_EMAIL", defaults.fallback_admin_email),
            fallback_admin_first_name: var(
                "FALLBACK_ADMIN_FIRST_NAME",
                defaults.fallback_admin_first_name,
            ),
            fallback_admin_last_name: var(
                "FALLBACK_ADMIN_LAST_NAME",
                defaults.fallback_admin_last_name,
            ),
            default_client_name: var("DEFAULT_CLIENT_NAME", defaults.default_client_name),
            default_client_contact: var("DEFAULT_CLIENT_CONTACT", defaults.default_client_contact),
            default_client_email: var("DEFAULT_CLIENT_EMAIL", defaults.default_client_email),
        }
    }
}

// ---------------------------------------------------------------------------
// EntityResolver
// ---------------------------------------------------------------------------

pub struct EntityResolver<'a> {
    config: &'a BootstrapConfig,
}

impl<'a> EntityResolver<'a> {
    pub fn new(config: &'a BootstrapConfig) -> Self {
        Self { config }
    }

    /// First admin; else the first user of any role; else a freshly created
    /// fallback admin.
    pub async fn resolve_admin(&self, conn: &mut PgConnection) -> LifecycleResult<User> {
        if let Some(admin) = UserRepo::find_first_by_role(&mut *conn, ROLE_ADMIN).await? {
            return Ok(admin);
        }
        if let Some(anyone) = UserRepo::find_first(&mut *conn).await? {
            return Ok(anyone);
        }

        let input = CreateUser {
            email: self.config.fallback_admin_email.clone(),
            first_name: self.config.fallback_admin_first_name.clone(),
            last_name: self.config.fallback_admin_last_name.clone(),
            role: ROLE_ADMIN.to_string(),
        };
        if let Some(created) = UserRepo::insert_if_absent(&mut *conn, &input).await? {
            tracing::info!(user_id = %created.id, email = %created.email, "Created fallback admin");
            return Ok(created);
        }

        tracing::debug!("Fallback admin creation raced, re-querying");
        match UserRepo::find_by_email(&mut *conn, &input.email).await? {
            Some(user) => Ok(user),
            None => UserRepo::find_first(&mut *conn)
                .await?
                .ok_or_else(|| CoreError::Internal("No user could be resolved".into()).into()),
        }
    }

    /// The acting admin when it exists in `users`, else [`Self::resolve_admin`].
    pub async fn resolve_reviewer(
        &self,
        conn: &mut PgConnection,
        actor_id: DbId,
    ) -> LifecycleResult<User> {
        match UserRepo::find_by_id(&mut *conn, actor_id).await? {
            Some(user) if roles::is_admin(&user.role) => Ok(user),
            _ => self.resolve_admin(conn).await,
        }
    }

    /// Client named `name_hint` (case-insensitive), created if missing; the
    /// default client when the hint is blank.
    pub async fn resolve_client(
        &self,
        conn: &mut PgConnection,
        name_hint: Option<&str>,
    ) -> LifecycleResult<Client> {
        match name_hint.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => self.resolve_named_client(conn, name).await,
            None => self.resolve_default_client(conn).await,
        }
    }

    async fn resolve_named_client(
        &self,
        conn: &mut PgConnection,
        name: &str,
    ) -> LifecycleResult<Client> {
        if let Some(existing) = ClientRepo::find_by_name(&mut *conn, name).await? {
            return Ok(existing);
        }

        let input = CreateClient {
            company_name: name.to_string(),
            contact_name: self.config.default_client_contact.clone(),
            email: String::new(),
            is_default: false,
        };
        if let Some(created) = ClientRepo::insert_if_absent(&mut *conn, &input).await? {
            tracing::info!(client_id = %created.id, company_name = %name, "Created client");
            return Ok(created);
        }

        ClientRepo::find_by_name(&mut *conn, name)
            .await?
            .ok_or_else(|| CoreError::Internal(format!("Client '{name}' could not be resolved")).into())
    }

    async fn resolve_default_client(&self, conn: &mut PgConnection) -> LifecycleResult<Client> {
        if let Some(default) = ClientRepo::find_default(&mut *conn).await? {
            return Ok(default);
        }

        let input = CreateClient {
            company_name: self.config.default_client_name.clone(),
            contact_name: self.config.default_client_contact.clone(),
            email: self.config.default_client_email.clone(),
            is_default: true,
        };
        if let Some(created) = ClientRepo::insert_if_absent(&mut *conn, &input).await? {
            tracing::info!(client_id = %created.id, "Created default client");
            return Ok(created);
        }

        // Lost a race for the default slot, or a regular client already has
        // the default name.
        if let Some(default) = ClientRepo::find_default(&mut *conn).await? {
            return Ok(default);
        }
        ClientRepo::find_by_name(&mut *conn, &input.company_name)
            .await?
            .ok_or_else(|| CoreError::Internal("Default client could not be resolved".into()).into())
    }
}
