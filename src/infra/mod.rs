pub mod http_client;

pub use http_client::{fetch_json, HttpClientPort, HttpRequest, HttpResponse, ReqwestHttp};
