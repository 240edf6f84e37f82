use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

pub(crate) struct BaseClient {
    address: String,
}

#[derive(Debug)]
pub enum APIError {
    Network,
    MalformedResponse,
    UnexpectedStatusCode(StatusCode),
}
pub type APIResponse<T> = Result<T, APIError>;

impl BaseClient {
    pub fn new(address: String) -> Self {
        Self { address }
    }

    fn get_client(&self, method: Method, path: String) -> RequestBuilder {
        let client = Client::new();
        let url = format!("{}/api/v1/{}", self.address, path);
        client.request(method, &url)
    }

    fn check_status_code(
        &self,
        res: &Response,
        expected_status_code: &[StatusCode],
    ) -> Result<(), APIError> {
        let status = res.status();
        if !expected_status_code.contains(&status) {
            return Err(APIError::UnexpectedStatusCode(status));
        }
        Ok(())
    }

    async fn get_json_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Response,
    ) -> APIResponse<T> {
        res.json::<T>()
            .await
            .map_err(|_| APIError::MalformedResponse)
    }

    async fn handle_api_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Response,
        expected_status_code: &[StatusCode],
    ) -> APIResponse<T> {
        self.check_status_code(&res, expected_status_code)?;
        self.get_json_response(res).await
    }

    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = match self.get_client(Method::GET, path).send().await {
            Ok(res) => res,
            Err(_) => return Err(APIError::Network),
        };
        self.handle_api_response(res, &[expected_status_code]).await
    }

    pub async fn put<T: for<'de> Deserialize<'de>, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = match self.get_client(Method::PUT, path).json(&body).send().await {
            Ok(res) => res,
            Err(_) => return Err(APIError::Network),
        };
        self.handle_api_response(res, &[expected_status_code]).await
    }

    pub async fn post<T: for<'de> Deserialize<'de>, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = match self.get_client(Method::POST, path).json(&body).send().await {
            Ok(res) => res,
            Err(_) => return Err(APIError::Network),
        };
        self.handle_api_response(res, &[expected_status_code]).await
    }

    /// Posts the body as is together with extra headers, accepting any of
    /// the given status codes
    pub async fn post_raw<T: for<'de> Deserialize<'de>>(
        &self,
        body: Vec<u8>,
        headers: &[(&str, &str)],
        path: String,
        expected_status_codes: &[StatusCode],
    ) -> APIResponse<T> {
        let builder = headers.iter().fold(
            self.get_client(Method::POST, path)
                .header("content-type", "application/json")
                .body(body),
            |builder, (name, value)| builder.header(*name, *value),
        );
        let res = match builder.send().await {
            Ok(res) => res,
            Err(_) => return Err(APIError::Network),
        };
        self.handle_api_response(res, expected_status_codes).await
    }
}
