//! Routes that exist independently of any session menu.

use crate::RouteDescriptor;

/// Well-known paths of the static route set.
#[derive(Debug, Clone, Copy)]
pub struct StaticPaths;

impl StaticPaths {
    pub const LOGIN: &'static str = "/login";
    pub const REGISTER: &'static str = "/register";
    pub const FORGET_PASSWORD: &'static str = "/forget-password";
    pub const FORBIDDEN: &'static str = "/exception/403";
    pub const NOT_FOUND: &'static str = "/exception/404";
    pub const SERVER_ERROR: &'static str = "/exception/500";
}

/// The static route set installed before any dynamic registration.
///
/// Auth pages and the payment flow are reachable without a session; the
/// exception pages are not.
pub fn static_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new(StaticPaths::LOGIN, "Login")
            .with_component("/auth/login/index")
            .without_tab(),
        RouteDescriptor::new(StaticPaths::REGISTER, "Register")
            .with_component("/auth/register/index")
            .without_tab()
            .public(),
        RouteDescriptor::new(StaticPaths::FORGET_PASSWORD, "ForgetPassword")
            .with_component("/auth/forget-password/index")
            .without_tab()
            .public(),
        RouteDescriptor::new("/payment", "PaymentLayout")
            .with_component("/vmq/payment/PaymentLayout")
            .without_tab()
            .public()
            .with_children(vec![
                RouteDescriptor::new(":orderId", "Payment")
                    .with_title("Scan to pay")
                    .with_component("/vmq/payment/PaymentPage"),
                RouteDescriptor::new("result/:orderId", "PaymentResult")
                    .with_title("Payment result")
                    .with_component("/vmq/payment/PaymentResult"),
            ]),
        RouteDescriptor::new("/exception", "Exception")
            .with_component("/index/index")
            .with_children(vec![
                RouteDescriptor::new(StaticPaths::FORBIDDEN, "Exception403")
                    .with_title("403")
                    .with_component("/exception/403/index"),
                RouteDescriptor::new(StaticPaths::NOT_FOUND, "Exception404")
                    .with_title("404")
                    .with_component("/exception/404/index"),
                RouteDescriptor::new(StaticPaths::SERVER_ERROR, "Exception500")
                    .with_title("500")
                    .with_component("/exception/500/index"),
            ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn static_names_are_unique() {
        fn collect<'a>(tree: &'a [RouteDescriptor], out: &mut Vec<&'a str>) {
            for node in tree {
                out.push(&node.name);
                collect(node.children(), out);
            }
        }
        let routes = static_routes();
        let mut names = Vec::new();
        collect(&routes, &mut names);
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn login_requires_no_menu_roles() {
        let routes = static_routes();
        assert!(routes.iter().all(|r| r.meta.roles.is_none()));
    }
}
