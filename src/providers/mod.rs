pub mod http_renderer;
pub mod static_renderer;
pub mod util;

pub use http_renderer::HttpRenderer;
pub use static_renderer::StaticRenderer;
