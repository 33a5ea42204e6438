pub mod auth_handler;

pub use auth_handler::{
    __path_check_status, __path_login, __path_private_route, __path_privileged_route,
    __path_register, check_status, login, private_route, privileged_route, register,
};
