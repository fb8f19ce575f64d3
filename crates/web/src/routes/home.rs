//! Landing page.
//!
//! The marketing pages of the original site are out of scope; the landing
//! page is a slim entry point into the marketplace, and the target of the
//! wrong-role guard redirect.

use askama::Template;
use askama_web::WebTemplate;
use tower_sessions::Session;

use crate::models::nav::Nav;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
}

/// Display the landing page.
pub async fn home(session: Session) -> HomeTemplate {
    HomeTemplate {
        nav: Nav::load(&session).await,
    }
}
