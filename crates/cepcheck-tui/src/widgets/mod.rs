mod cep_form;
mod nav_bar;
mod page_view;
mod result;
mod status_bar;

pub use cep_form::CepFormWidget;
pub use nav_bar::NavBarWidget;
pub use page_view::PageViewWidget;
pub use result::ResultWidget;
pub use status_bar::StatusBarWidget;
