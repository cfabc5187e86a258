/*!
 * 角色校验中间件
 *
 * 依赖 RequireJWT 先写入的 Claims，必须挂在 RequireJWT 之内：
 *
 * ```rust,ignore
 * web::scope("/api/v1/users")
 *     .wrap(RequireJWT)
 *     .service(
 *         web::resource("")
 *             .wrap(RequireRole::new(&UserRole::Admin))
 *             .route(web::get().to(list_users)),
 *     )
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::{
    models::{ErrorCode, users::entities::UserRole},
    utils::jwt::Claims,
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    /// 仅允许指定角色
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed: Rc::from([role.clone()]),
        }
    }

    /// 允许列表中的任一角色
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    fn permits(allowed: &[UserRole], role: Option<&UserRole>) -> bool {
        role.is_some_and(|role| allowed.contains(role))
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let Some(claims) = req.extensions().get::<Claims>().cloned() else {
                // 未挂载 RequireJWT 或令牌未通过
                info!("Role check without claims on {}", req.path());
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            let role = claims.user_role();
            if RequireRole::permits(&allowed, role.as_ref()) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            info!(
                "User {} with role {} denied access to {}",
                claims.sub, claims.role, req.path()
            );
            Ok(req.into_response(
                create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    "Forbidden: insufficient role",
                )
                .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    fn claims_for(role: &UserRole) -> Claims {
        let now = chrono::Utc::now().timestamp() as usize;
        Claims {
            sub: "7".to_string(),
            email: "someone@example.com".to_string(),
            role: role.to_string(),
            exp: now + 60,
            iat: now,
        }
    }

    #[::core::prelude::v1::test]
    fn test_permits() {
        let admin_only = RequireRole::new(&UserRole::Admin);
        assert!(RequireRole::permits(
            &admin_only.allowed,
            Some(&UserRole::Admin)
        ));
        assert!(!RequireRole::permits(
            &admin_only.allowed,
            Some(&UserRole::User)
        ));
        assert!(!RequireRole::permits(&admin_only.allowed, None));

        let anyone = RequireRole::new_any(UserRole::all_roles());
        assert!(RequireRole::permits(&anyone.allowed, Some(&UserRole::User)));
    }

    #[actix_web::test]
    async fn test_role_gate_responses() {
        let app = test::init_service(
            App::new().service(
                web::resource("/admin")
                    .wrap(RequireRole::new(&UserRole::Admin))
                    .route(web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/admin").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let req = test::TestRequest::get().uri("/admin").to_request();
        req.extensions_mut().insert(claims_for(&UserRole::User));
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::get().uri("/admin").to_request();
        req.extensions_mut().insert(claims_for(&UserRole::Admin));
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
