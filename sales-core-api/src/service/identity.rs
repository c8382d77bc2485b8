use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use sales_core_db::models::{
    DepartmentModel, Gender, Role, UserModel, UserProfileModel, SYSTEM_ACTOR_ID,
};
use sales_core_db::repository::{Load, Page, PageRequest, UnitOfWork, UnitOfWorkSession};

use crate::auth::{
    validate_password, validate_username, CredentialService, Credentials, TokenClaims,
    TokenService,
};
use crate::error::{ServiceError, ServiceResult};
use crate::scope::{resolve_scope, role_gate, Operation, Scope};
use crate::service::organization::first;
use crate::service::{audit, required_text};

/// A successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserModel,
    pub token: String,
}

/// Personal details a user maintains about themself
#[derive(Debug, Clone, Default, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i16>,
    pub gender: Option<Gender>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
}

/// Users, their roles and credentials
pub struct IdentityRegistry<U> {
    store: Arc<U>,
    credentials: Arc<dyn CredentialService>,
    tokens: Arc<dyn TokenService>,
}

impl<U: UnitOfWork> IdentityRegistry<U> {
    pub fn new(
        store: Arc<U>,
        credentials: Arc<dyn CredentialService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            store,
            credentials,
            tokens,
        }
    }

    /// Self-registration. New accounts get the `Default` role until an
    /// administrator assigns one.
    pub async fn register_user(
        &self,
        credentials: Credentials,
        department_id: Option<Uuid>,
    ) -> ServiceResult<UserModel> {
        self.create_account(credentials, Role::Default, department_id).await
    }

    /// Create the first system administrator of an empty installation
    pub async fn bootstrap_administrator(
        &self,
        credentials: Credentials,
    ) -> ServiceResult<UserModel> {
        self.create_account(credentials, Role::SystemAdministrator, None).await
    }

    async fn create_account(
        &self,
        credentials: Credentials,
        role: Role,
        department_id: Option<Uuid>,
    ) -> ServiceResult<UserModel> {
        credentials.validate()?;
        let password_hash = self.credentials.hash(&credentials.password)?;
        let mut user = UserModel::new(
            required_text("username", &credentials.username)?,
            password_hash,
            role,
        );

        let session = self.store.begin().await?;
        // Administrators are only created through bootstrap; later ones get the role assigned
        if role == Role::SystemAdministrator
            && session.users().count_by_role(Role::SystemAdministrator).await? > 0
        {
            return Err(ServiceError::InvalidState("a system administrator already exists".into()));
        }
        if let Some(department_id) = department_id {
            let department: DepartmentModel = session.departments().load(department_id).await?;
            user.department_id = Some(department.id);
            user.zone_id = department.zone_id;
        }
        let user = first(session.users().create_batch(vec![user]).await?)?;
        audit(
            &session,
            user.id,
            format!("registered user {} as {}", user.username, user.role),
        )
        .await?;
        session.commit().await?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "user registered");
        Ok(user)
    }

    /// Check credentials and issue a token. Failed attempts are audited and
    /// reported as `Forbidden` without telling which part was wrong.
    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<LoginOutcome> {
        let session = self.store.begin().await?;
        let Some(user) = session.users().find_by_username(username).await? else {
            audit(
                &session,
                SYSTEM_ACTOR_ID,
                format!("failed login for unknown user {username}"),
            )
            .await?;
            session.commit().await?;
            warn!(username, "login rejected: unknown user");
            return Err(ServiceError::Forbidden("invalid username or password".into()));
        };

        if !self.credentials.verify(password, &user.password_hash)? {
            audit(&session, user.id, "failed login: wrong password").await?;
            session.commit().await?;
            warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(ServiceError::Forbidden("invalid username or password".into()));
        }

        let token = self.tokens.issue(&user)?;
        audit(&session, user.id, "logged in").await?;
        session.commit().await?;

        info!(user_id = %user.id, "user logged in");
        Ok(LoginOutcome { user, token })
    }

    /// Turn decoded token claims into the caller's current scope.
    ///
    /// A token naming a role the user no longer holds is rejected.
    pub async fn resolve_claims(&self, claims: &TokenClaims) -> ServiceResult<Scope> {
        let session = self.store.begin().await?;
        let user = session
            .users()
            .find_by_username(&claims.username)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {}", claims.username)))?;

        match Role::from_name(&claims.user_role) {
            Some(role) if role == user.role => Ok(resolve_scope(&user)),
            Some(_) => {
                warn!(
                    user_id = %user.id,
                    claimed = %claims.user_role,
                    actual = %user.role,
                    "stale role in token"
                );
                Err(ServiceError::Forbidden("token role no longer matches the user".into()))
            }
            None => Err(ServiceError::Forbidden(format!("unknown role {}", claims.user_role))),
        }
    }

    /// Validate a bearer token and resolve the caller's scope
    pub async fn authenticate(&self, token: &str) -> ServiceResult<Scope> {
        let claims = self.tokens.validate(token)?;
        self.resolve_claims(&claims).await
    }

    pub async fn get_user(&self, actor: &Scope, user_id: Uuid) -> ServiceResult<UserModel> {
        if actor.user_id != user_id {
            role_gate(actor, Operation::ManageUsers)?;
        }
        let session = self.store.begin().await?;
        Ok(session.users().load(user_id).await?)
    }

    pub async fn list_users(
        &self,
        actor: &Scope,
        page: PageRequest,
    ) -> ServiceResult<Page<UserModel>> {
        role_gate(actor, Operation::ManageUsers)?;
        let session = self.store.begin().await?;
        Ok(session.users().list(page).await?)
    }

    /// Change username and/or password. Allowed for the user themself and
    /// for system administrators.
    pub async fn update_credentials(
        &self,
        actor: &Scope,
        user_id: Uuid,
        username: Option<String>,
        password: Option<String>,
    ) -> ServiceResult<UserModel> {
        if actor.user_id != user_id {
            role_gate(actor, Operation::ManageUsers)?;
        }
        if let Some(username) = &username {
            validate_username(username).map_err(|e| ServiceError::Validation(e.to_string()))?;
        }
        let password_hash = match &password {
            Some(password) => {
                validate_password(password).map_err(|e| ServiceError::Validation(e.to_string()))?;
                Some(self.credentials.hash(password)?)
            }
            None => None,
        };

        let session = self.store.begin().await?;
        let mut user: UserModel = session.users().load(user_id).await?;
        if let Some(username) = &username {
            user.username = required_text("username", username)?;
        }
        if let Some(password_hash) = password_hash {
            user.password_hash = password_hash;
        }
        let user = first(session.users().update_batch(vec![user]).await?)?;
        audit(
            &session,
            actor.user_id,
            format!("updated credentials of user {}", user.username),
        )
        .await?;
        session.commit().await?;

        info!(user_id = %user.id, "credentials updated");
        Ok(user)
    }

    /// Assign a role. Losing a sales role releases the user's leads;
    /// losing the manager or director role clears the matching reference.
    pub async fn update_user_role(
        &self,
        actor: &Scope,
        user_id: Uuid,
        role: Role,
    ) -> ServiceResult<UserModel> {
        role_gate(actor, Operation::ManageUsers)?;

        let session = self.store.begin().await?;
        let mut user: UserModel = session.users().load(user_id).await?;
        let previous = user.role;
        if previous == Role::SystemAdministrator
            && role != Role::SystemAdministrator
            && session.users().count_by_role(Role::SystemAdministrator).await? <= 1
        {
            return Err(ServiceError::InvalidState(
                "cannot demote the last system administrator".into(),
            ));
        }

        if previous == Role::SalesManager && role != Role::SalesManager {
            session.departments().clear_manager(user.id).await?;
        }
        if previous == Role::SalesDirector && role != Role::SalesDirector {
            session.zones().clear_director(user.id).await?;
        }
        let released = if previous.is_sales() && !role.is_sales() {
            session.customers().release_owned_by(user.id).await?
        } else {
            0
        };

        user.role = role;
        let user = first(session.users().update_batch(vec![user]).await?)?;
        audit(
            &session,
            actor.user_id,
            format!("changed role of user {} from {} to {}", user.username, previous, role),
        )
        .await?;
        session.commit().await?;

        info!(user_id = %user.id, %previous, %role, released, "user role updated");
        Ok(user)
    }

    /// Create or replace the actor's own profile
    pub async fn update_profile(
        &self,
        actor: &Scope,
        update: ProfileUpdate,
    ) -> ServiceResult<UserProfileModel> {
        update.validate()?;
        let profile = UserProfileModel {
            user_id: actor.user_id,
            name: required_text("name", &update.name)?,
            age: update.age,
            gender: update.gender,
            address: update.address,
            phone: update
                .phone
                .as_deref()
                .map(|phone| required_text("phone", phone))
                .transpose()?,
        };

        let session = self.store.begin().await?;
        let _: UserModel = session.users().load(actor.user_id).await?;
        let profile = session.user_profiles().upsert(profile).await?;
        audit(&session, actor.user_id, "updated profile").await?;
        session.commit().await?;

        Ok(profile)
    }

    pub async fn get_profile(
        &self,
        actor: &Scope,
        user_id: Uuid,
    ) -> ServiceResult<Option<UserProfileModel>> {
        if actor.user_id != user_id {
            role_gate(actor, Operation::ManageUsers)?;
        }
        let session = self.store.begin().await?;
        Ok(session.user_profiles().find_by_user_id(user_id).await?)
    }

    /// Remove a user. Their leads go to the public sea and any manager or
    /// director reference to them is cleared, all in one transaction.
    pub async fn delete_user(&self, actor: &Scope, user_id: Uuid) -> ServiceResult<()> {
        role_gate(actor, Operation::ManageUsers)?;
        if actor.user_id == user_id {
            return Err(ServiceError::InvalidState(
                "administrators cannot delete themselves".into(),
            ));
        }

        let session = self.store.begin().await?;
        let user: UserModel = session.users().load(user_id).await?;
        let released = session.customers().release_owned_by(user.id).await?;
        session.departments().clear_manager(user.id).await?;
        session.zones().clear_director(user.id).await?;
        session.user_profiles().delete_by_user_id(user.id).await?;
        session.users().delete_batch(&[user.id]).await?;
        audit(
            &session,
            actor.user_id,
            format!("deleted user {} and released {} leads", user.username, released),
        )
        .await?;
        session.commit().await?;

        info!(user_id = %user.id, released, "user deleted");
        Ok(())
    }
}
