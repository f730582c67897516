use crate::error::ApiError;
use crate::middleware::auth::RequestContext;

/// Authorization predicate evaluated against the request context after the
/// authentication stage has run. Guards perform no I/O; they only inspect the
/// identity already attached to the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Any authenticated caller.
    LoggedIn,
    /// An authenticated admin.
    Admin,
    /// An admin, or the caller whose username matches the path parameter.
    AdminOrSelf(String),
}

impl Guard {
    pub fn check(&self, context: &RequestContext) -> Result<(), ApiError> {
        let identity = context.identity.as_ref().ok_or_else(unauthorized)?;

        match self {
            Guard::LoggedIn => Ok(()),
            Guard::Admin => {
                if identity.is_admin {
                    Ok(())
                } else {
                    Err(unauthorized())
                }
            }
            Guard::AdminOrSelf(username) => {
                if identity.is_admin || identity.username == *username {
                    Ok(())
                } else {
                    Err(unauthorized())
                }
            }
        }
    }
}

/// Evaluate guards left to right, stopping at the first failure. Neither later
/// guards nor the handler run once a guard has refused the request.
pub fn authorize(context: &RequestContext, guards: &[Guard]) -> Result<(), ApiError> {
    for guard in guards {
        guard.check(context)?;
    }
    Ok(())
}

fn unauthorized() -> ApiError {
    ApiError::unauthorized("You must be authorized to access this resource")
}
