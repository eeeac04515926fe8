// Route handlers, grouped by resource.
//
// Public:    GET /, GET /health, GET /api/courses[/:id], POST /api/users
// Protected: GET /api/users, POST /api/courses, PUT|DELETE /api/courses/:id
//
// Protected handlers receive the caller through `Extension<AuthenticatedContext>`,
// inserted by `middleware::basic_auth_middleware`.

pub mod courses;
pub mod root;
pub mod users;
