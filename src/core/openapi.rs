use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ErrorBody, ErrorDetail, HealthDto, MessageDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        // Users
        users_handlers::list_users,
        users_handlers::get_user,
        users_handlers::create_user,
        users_handlers::update_user,
        users_handlers::delete_user,
        // Files
        files_handlers::list_files,
        files_handlers::get_file,
        files_handlers::list_user_files,
        files_handlers::upload_file,
        files_handlers::download_file,
        files_handlers::delete_file,
    ),
    components(
        schemas(
            // Shared
            ErrorBody,
            ErrorDetail,
            MessageDto,
            HealthDto,
            // Auth
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::TokenResponseDto,
            // Users
            users_dtos::UserDto,
            users_dtos::CreateUserDto,
            users_dtos::UpdateUserDto,
            users_dtos::UserEnvelope,
            users_dtos::UsersEnvelope,
            // Files
            files_dtos::FileDto,
            files_dtos::FileEnvelope,
            files_dtos::FilesEnvelope,
            files_dtos::UploadFileDto,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "User account management"),
        (name = "files", description = "File upload, download and management"),
        (name = "health", description = "Service health"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Filevault API",
        version = "0.1.0",
        description = "API documentation for Filevault",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
