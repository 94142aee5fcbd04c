use thiserror::Error;

pub mod api;
pub mod chart;
pub mod cli;
pub mod template;

pub use api::{CurrentPrice, PriceInfo, PricePoint, TibberClient, TIBBER_API_URL};
pub use chart::{Chart, NowMarker, Theme};
pub use template::{compact_svg, RenderContext, SvgTemplate};

#[derive(Error, Debug)]
pub enum TibberError {
    #[error("http request error")]
    Reqwest(#[from] reqwest::Error),
    #[error("api responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("api response could not be decoded")]
    Decode(#[from] serde_json::Error),
    #[error("api reported errors: {}", .0.join("; "))]
    Api(Vec<String>),
    #[error("api response is missing `{0}`")]
    MissingField(&'static str),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template error")]
    Template(#[from] minijinja::Error),
    #[error("rendered svg is not well-formed xml")]
    Xml(#[from] quick_xml::Error),
    #[error("reading template failed")]
    Io(#[from] std::io::Error),
}
