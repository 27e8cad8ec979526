/// Router Module Index
///
/// Splits the HTTP surface by who may reach it. Access control is not applied here:
/// the route guard layer in `create_router` classifies every non-excluded path by
/// prefix, so these modules only decide where handlers are mounted.

/// Pages open to everyone, including the sign-in flow the guard keeps signed-in
/// visitors away from.
pub mod public;

/// Pages under the guard's protected prefixes (`/dashboard`, `/profile`).
pub mod authenticated;

/// Back-office pages under `/admin`, also protected by prefix.
pub mod admin;

/// JSON endpoints under `/api`, excluded from the guard.
pub mod api;
