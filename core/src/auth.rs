// storefront/src/auth.rs

//! Shopper sign-up, sign-in and sign-out.

use crate::backend::DataAccess;
use crate::checkout::redirect::{RedirectMemory, HOME_PATH};
use crate::errors::{StoreError, StoreResult};
use crate::models::{Session, User};
use crate::pipeline::{ContextData, Pipeline, PipelineControl};
use std::fmt;
use std::sync::Arc;
use tracing::{event, info, instrument, warn, Level};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
  pub email: String,
  pub password: String,
  pub confirm_password: String,
}

impl fmt::Debug for SignUpForm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SignUpForm").field("email", &self.email).finish_non_exhaustive()
  }
}

/// A successful sign-in and where to navigate next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutcome {
  pub session: Session,
  pub redirect_to: String,
}

struct SignUpCtxData {
  data: Arc<dyn DataAccess>,
  form: SignUpForm,
  created_user: Option<User>,
}

struct SignInCtxData {
  data: Arc<dyn DataAccess>,
  redirects: RedirectMemory,
  email: String,
  password: String,
  session: Option<Session>,
  redirect_to: Option<String>,
}

fn build_signup_pipeline() -> Pipeline<SignUpCtxData, StoreError> {
  let mut p = Pipeline::<SignUpCtxData, StoreError>::new(&[
    ("validate_signup_input", false, None),
    ("register_account", false, None),
  ]);

  p.on_root("validate_signup_input", |ctx_data: ContextData<SignUpCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let form = &guard.form;
      event!(Level::DEBUG, email = %form.email, "Validating sign-up input.");
      if form.email.trim().is_empty() || form.password.is_empty() || form.confirm_password.is_empty() {
        return Err(StoreError::InvalidInput("All fields are required".to_string()));
      }
      if form.password != form.confirm_password {
        return Err(StoreError::InvalidInput("Passwords do not match".to_string()));
      }
      if form.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("Password too short for sign-up.");
        return Err(StoreError::InvalidInput(format!(
          "Password must be at least {} characters long",
          MIN_PASSWORD_LEN
        )));
      }
      Ok(PipelineControl::Continue)
    })
  });

  p.on_root("register_account", |ctx_data: ContextData<SignUpCtxData>| {
    Box::pin(async move {
      let (data, email, password) = {
        let guard = ctx_data.read();
        (guard.data.clone(), guard.form.email.trim().to_string(), guard.form.password.clone())
      };
      let user = data.sign_up(&email, &password).await?;
      info!(user_id = %user.id, "Account registered.");
      ctx_data.write().created_user = Some(user);
      Ok::<_, StoreError>(PipelineControl::Continue)
    })
  });

  p
}

fn build_signin_pipeline() -> Pipeline<SignInCtxData, StoreError> {
  let mut p = Pipeline::<SignInCtxData, StoreError>::new(&[
    ("validate_signin_input", false, None),
    ("authenticate", false, None),
    ("resolve_redirect", false, None),
  ]);

  p.on_root("validate_signin_input", |ctx_data: ContextData<SignInCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      if guard.email.trim().is_empty() || guard.password.is_empty() {
        return Err(StoreError::InvalidInput("Email and password are required".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });

  p.on_root("authenticate", |ctx_data: ContextData<SignInCtxData>| {
    Box::pin(async move {
      let (data, email, password) = {
        let guard = ctx_data.read();
        (guard.data.clone(), guard.email.trim().to_string(), guard.password.clone())
      };
      let session = data.sign_in(&email, &password).await?;
      ctx_data.write().session = Some(session);
      Ok::<_, StoreError>(PipelineControl::Continue)
    })
  });

  p.on_root("resolve_redirect", |ctx_data: ContextData<SignInCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let destination = guard.redirects.take().unwrap_or_else(|| HOME_PATH.to_string());
      guard.redirect_to = Some(destination);
      Ok::<_, StoreError>(PipelineControl::Continue)
    })
  });

  p
}

/// Entry point for the login and sign-up pages.
#[derive(Clone)]
pub struct AuthFlow {
  data: Arc<dyn DataAccess>,
  redirects: RedirectMemory,
  signup: Arc<Pipeline<SignUpCtxData, StoreError>>,
  signin: Arc<Pipeline<SignInCtxData, StoreError>>,
}

impl AuthFlow {
  pub fn new(data: Arc<dyn DataAccess>, redirects: RedirectMemory) -> Self {
    Self {
      data,
      redirects,
      signup: Arc::new(build_signup_pipeline()),
      signin: Arc::new(build_signin_pipeline()),
    }
  }

  #[instrument(name = "AuthFlow::sign_up", skip(self, form), fields(email = %form.email), err(Display))]
  pub async fn sign_up(&self, form: SignUpForm) -> StoreResult<User> {
    let ctx_data = ContextData::new(SignUpCtxData {
      data: self.data.clone(),
      form,
      created_user: None,
    });
    self.signup.run(ctx_data.clone()).await?;
    let created = ctx_data.write().created_user.take();
    created.ok_or_else(|| StoreError::Internal("Sign-up finished without creating a user".to_string()))
  }

  /// Signs in and consumes the remembered redirect, if any.
  #[instrument(name = "AuthFlow::sign_in", skip(self, password), err(Display))]
  pub async fn sign_in(&self, email: &str, password: &str) -> StoreResult<SignInOutcome> {
    let ctx_data = ContextData::new(SignInCtxData {
      data: self.data.clone(),
      redirects: self.redirects.clone(),
      email: email.to_string(),
      password: password.to_string(),
      session: None,
      redirect_to: None,
    });
    self.signin.run(ctx_data.clone()).await?;

    let mut guard = ctx_data.write();
    match (guard.session.take(), guard.redirect_to.take()) {
      (Some(session), Some(redirect_to)) => Ok(SignInOutcome { session, redirect_to }),
      _ => Err(StoreError::Internal("Sign-in finished without a session".to_string())),
    }
  }

  pub async fn sign_out(&self) -> StoreResult<()> {
    self.data.sign_out().await
  }

  pub async fn current_session(&self) -> StoreResult<Option<Session>> {
    self.data.get_session().await
  }
}
