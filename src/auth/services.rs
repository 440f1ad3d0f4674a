use anyhow::Context;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest},
        password::{hash_password_blocking, verify_password_blocking},
        repo_types::NewUser,
    },
    error::AppError,
    state::AppState,
};

/// A freshly issued token together with the user it belongs to.
#[derive(Debug)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

#[instrument(skip_all, fields(email = %req.email))]
pub async fn register(st: &AppState, req: RegisterRequest) -> Result<Session, AppError> {
    let req = req.normalize();
    req.validate()?;

    if st.users.find_by_email(&req.email).await?.is_some() {
        warn!("email already registered");
        return Err(AppError::Conflict("User with this email already exists"));
    }

    let password_hash = hash_password_blocking(req.password).await?;

    // A concurrent registration may win between the lookup and the insert.
    let user = st
        .users
        .create(NewUser {
            name: req.name,
            email: req.email,
            password_hash,
        })
        .await?
        .ok_or(AppError::Conflict("User with this email already exists"))?;

    let token = st.jwt.sign(user.id, &user.email).context("sign token")?;
    info!(user_id = user.id, "user registered");
    Ok(Session {
        token,
        user: user.into(),
    })
}

#[instrument(skip_all, fields(email = %req.email))]
pub async fn login(st: &AppState, req: LoginRequest) -> Result<Session, AppError> {
    let req = req.normalize();
    req.validate()?;

    let Some(user) = st.users.find_by_email(&req.email).await? else {
        warn!("login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let ok = verify_password_blocking(req.password, user.password_hash.clone()).await?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = st.jwt.sign(user.id, &user.email).context("sign token")?;
    info!(user_id = user.id, "user logged in");
    Ok(Session {
        token,
        user: user.into(),
    })
}

#[instrument(skip(st))]
pub async fn current_user(st: &AppState, user_id: i64) -> Result<PublicUser, AppError> {
    st.users
        .find_by_id(user_id)
        .await?
        .map(PublicUser::from)
        .ok_or(AppError::Unauthenticated("User no longer exists"))
}
