use rocket::{http::Status, routes};

#[rocket::get("/")]
pub async fn healthcheck() -> Status {
    Status::Ok
}

pub fn routes() -> Vec<rocket::Route> {
    routes![healthcheck]
}

#[cfg(test)]
mod tests {
    use crate::{Config, build_rocket};
    use rocket::http::Status;
    use rocket::local::asynchronous::Client;

    #[rocket::async_test]
    async fn health_check_works_and_anonymous_requests_get_no_cookie() {
        let client = Client::tracked(build_rocket(Config::default())).await.expect("valid rocket instance");

        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        // No session cookie was presented, so the gate must not push a
        // clearing cookie either.
        assert!(response.headers().get_one("Set-Cookie").is_none());
    }
}
