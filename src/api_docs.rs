use utoipa::OpenApi;

use crate::controllers::{auth_controller, calculator_controller, system_controller};
use crate::models::{auth, estimate};

#[derive(OpenApi)]
#[openapi(
    paths(
        calculator_controller::post_estimate,
        calculator_controller::get_latest_estimate,
        calculator_controller::get_comparison,
        calculator_controller::post_quick_estimate,
        auth_controller::login,
        auth_controller::signup,
        auth_controller::logout,
        auth_controller::get_session,
        system_controller::get_health
    ),
    components(
        schemas(
            estimate::EstimateInput,
            estimate::EstimateResult,
            estimate::MonthlyPoint,
            estimate::YearlyPoint,
            estimate::ComparisonResult,
            estimate::ComparisonRow,
            estimate::QuickEstimateRequest,
            estimate::QuickEstimate,
            estimate::SystemType,
            estimate::UserSegment,
            auth::LoginRequest,
            auth::SignupRequest,
            auth::Session,
            auth::SessionResponse,
            auth::User,
            system_controller::HealthStatus
        )
    ),
    tags(
        (name = "eco-invest-api", description = "Renewable Energy Investment Calculator API")
    )
)]
pub struct ApiDoc;
