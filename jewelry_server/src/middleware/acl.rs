//! Access control list middleware for the jewelry shop server.
//! This middleware can be placed on any route or service.
//!
//! It will check the incoming request for a valid JWT access token in the `Authorization` header and then check the
//! claims in the token against the required roles for the route. If the token is valid and the user has the required
//! roles, the request is allowed to continue. A missing or invalid token
//! results in a 401 Unauthorized response, and missing roles in a 403 Forbidden response.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web,
    Error,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use log::*;

use crate::{
    auth::{bearer_token, decode_access_token, Role},
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

pub struct AclMiddlewareFactory {
    required_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(required_roles: &[Role]) -> Self {
        AclMiddlewareFactory { required_roles: required_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { required_roles: self.required_roles.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    required_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required_roles = self.required_roles.clone();
        Box::pin(async move {
            authorize(&req, &required_roles)?;
            service.call(req).await
        })
    }
}

fn authorize(req: &ServiceRequest, required_roles: &[Role]) -> Result<(), ServerError> {
    let config = req.app_data::<web::Data<AuthConfig>>().ok_or_else(|| {
        error!("💻️ No auth configuration has been registered with the app. Denying access.");
        ServerError::ConfigurationError("Authentication is not configured".to_string())
    })?;
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AuthError::MissingToken)?;
    let claims = decode_access_token(token, config)?;
    if claims.has_roles(required_roles) {
        trace!("💻️ {} is authorized for {}", claims.sub, req.path());
        Ok(())
    } else {
        debug!("💻️ {} does not have the roles {required_roles:?} required for {}", claims.sub, req.path());
        Err(AuthError::InsufficientPermissions(format!("{required_roles:?} required")).into())
    }
}
