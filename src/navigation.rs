//! Moving the user between views once an edit surface is done.

/// The landing page for logged in users, where edit surfaces send the user
/// once they are done.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// Sends the user to another view.
///
/// Implemented by whatever owns the views, e.g. a browser history or a
/// terminal front end.
pub trait Navigator: Send + Sync {
    /// Go to `route`.
    fn push(&self, route: &str);
}
