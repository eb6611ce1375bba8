pub mod predict_response;
pub mod predict_route;
