mod common;

use common::{png_bytes, spawn, spot_fields};
use http::{Request, StatusCode, header};
use axum::body::Body;
use serde::Deserialize;

#[derive(Deserialize)]
struct Count {
    count: i64,
}

#[tokio::test]
async fn test_health() {
    let app = spawn().await;
    let res = app.get("/health", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["database"], true);
}

#[tokio::test]
async fn test_create_requires_login() {
    let app = spawn().await;
    let res = app
        .post_multipart("/create", &spot_fields("Bobst", "Library"), None, None)
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], "E3001");
}

#[tokio::test]
async fn test_form_options() {
    let app = spawn().await;
    for uri in ["/create", "/search"] {
        let res = app.get(uri, None).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["data"]["locations"][0], "On campus");
        assert_eq!(res.body["data"]["noise_levels"].as_array().unwrap().len(), 4);
    }
}

#[tokio::test]
async fn test_create_list_and_detail() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;

    let first = app.create_spot(&token, "Bobst", "Library").await;
    let second = app.create_spot(&token, "Think Coffee", "Cafe/Restaurant").await;

    let res = app.get("/", None).await;
    assert_eq!(res.status, StatusCode::OK);
    let spots = res.body["data"].as_array().unwrap();
    assert_eq!(spots.len(), 2);
    // newest first
    assert_eq!(spots[0]["id"], second.as_str());
    assert_eq!(spots[1]["id"], first.as_str());
    assert_eq!(spots[1]["average_star"], 0.0);
    assert_eq!(spots[1]["review_count"], 0);
    assert_eq!(spots[1]["location"], "On campus");

    let res = app.get(&format!("/detail?SpotId={}", first), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["spot"]["name"], "Bobst");
    assert!(res.body["data"]["reviews"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_location_rejected_without_insert() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;

    let mut fields = spot_fields("Bobst", "Library");
    fields[2] = ("location", "Moon base");
    let res = app.post_multipart("/create", &fields, None, Some(&token)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "E0002");
    // the submitted form comes back for re-display
    assert_eq!(res.body["data"]["location"], "Moon base");
    assert_eq!(res.body["data"]["name"], "Bobst");

    let listed = app.get("/", None).await;
    assert!(listed.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_name_rejected() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;
    let res = app
        .post_multipart("/create", &spot_fields("   ", "Library"), None, Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_spot_is_404() {
    let app = spawn().await;
    let res = app.get("/detail?SpotId=spot:doesnotexist", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/detail?SpotId=review:abc", None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rating_add_and_moderator_remove() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;
    let spot = app.create_spot(&token, "Bobst", "Library").await;

    let res = app
        .post_form("/detail/post", &[("spot_id", spot.as_str()), ("star", "5"), ("text", "Great")], Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["data"]["accepted"], true);
    let five_star = res.body["data"]["review_id"].as_str().unwrap().to_string();

    let res = app
        .post_form("/detail/post", &[("spot_id", spot.as_str()), ("star", "4"), ("text", "Good")], Some(&token))
        .await;
    assert_eq!(res.body["data"]["average_star"], 4.5);
    assert_eq!(res.body["data"]["review_count"], 2);

    let detail = app.get(&format!("/detail?SpotId={}", spot), None).await;
    assert_eq!(detail.body["data"]["spot"]["star_glyphs"], 5);
    let reviews = detail.body["data"]["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0]["text"], "Great");
    assert_eq!(reviews[0]["author_username"], "ak8257");

    // regular users cannot moderate
    let res = app
        .post_form("/moderator_detail", &[("review_id", five_star.as_str())], Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let moderator = app.moderator_token().await;
    let res = app
        .post_form("/moderator_detail", &[("review_id", five_star.as_str())], Some(&moderator))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);

    let detail = app.get(&format!("/detail?SpotId={}", spot), None).await;
    assert_eq!(detail.body["data"]["spot"]["average_star"], 4.0);
    assert_eq!(detail.body["data"]["spot"]["review_count"], 1);
    assert_eq!(detail.body["data"]["reviews"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_review_is_ignored() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;
    let spot = app.create_spot(&token, "Bobst", "Library").await;

    let res = app
        .post_form("/detail/post", &[("spot_id", spot.as_str()), ("star", "3"), ("text", "  ")], Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["accepted"], false);
    assert_eq!(res.body["data"]["review_count"], 0);

    let res = app
        .post_form("/detail/post", &[("spot_id", spot.as_str()), ("star", "7"), ("text", "hi")], Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let detail = app.get(&format!("/detail?SpotId={}", spot), None).await;
    assert!(detail.body["data"]["reviews"].as_array().unwrap().is_empty());
    assert_eq!(detail.body["data"]["spot"]["average_star"], 0.0);
}

#[tokio::test]
async fn test_duplicate_vote_rejected() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;
    let other = app.signup("jd1234").await;
    let spot = app.create_spot(&token, "Bobst", "Library").await;
    let res = app
        .post_form("/detail/post", &[("spot_id", spot.as_str()), ("star", "4"), ("text", "Nice")], Some(&token))
        .await;
    let review = res.body["data"]["review_id"].as_str().unwrap().to_string();

    let res = app
        .post_form("/detail/like", &[("review_id", review.as_str()), ("kind", "like")], Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["data"]["like_count"], 1);

    let res = app
        .post_form("/detail/like", &[("review_id", review.as_str()), ("kind", "dislike")], Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let res = app
        .post_form("/detail/like", &[("review_id", review.as_str()), ("kind", "dislike")], Some(&other))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["like_count"], 1);
    assert_eq!(res.body["data"]["dislike_count"], 1);

    let res = app
        .post_form("/detail/like", &[("review_id", review.as_str()), ("kind", "meh")], Some(&other))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_vote_requires_login() {
    let app = spawn().await;
    let res = app
        .post_form("/detail/like", &[("review_id", "review:x"), ("kind", "like")], None)
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_spot_delete_cascades() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;
    let spot = app.create_spot(&token, "Bobst", "Library").await;
    let keep = app.create_spot(&token, "Think Coffee", "Cafe/Restaurant").await;
    for (s, text) in [(&spot, "a"), (&spot, "b"), (&keep, "c")] {
        let res = app
            .post_form("/detail/post", &[("spot_id", s.as_str()), ("star", "3"), ("text", text)], Some(&token))
            .await;
        assert_eq!(res.status, StatusCode::OK);
    }

    let moderator = app.moderator_token().await;
    let res = app
        .post_form("/moderator_home", &[("spot_id", spot.as_str())], Some(&moderator))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);

    let res = app.get(&format!("/detail?SpotId={}", spot), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let mut result = app
        .state
        .db
        .query("SELECT count() FROM review GROUP ALL")
        .await
        .unwrap();
    let count: Option<Count> = result.take(0).unwrap();
    assert_eq!(count.map(|c| c.count), Some(1));

    let res = app
        .post_form("/moderator_home", &[("spot_id", spot.as_str())], Some(&moderator))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_spot_as_moderator() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;
    let spot = app.create_spot(&token, "Bobst", "Library").await;
    app.post_form("/detail/post", &[("spot_id", spot.as_str()), ("star", "2"), ("text", "ok")], Some(&token))
        .await;

    let res = app.get(&format!("/edit/{}", spot), Some(&token)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let moderator = app.moderator_token().await;
    let res = app.get(&format!("/edit/{}", spot), Some(&moderator)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["spot"]["name"], "Bobst");

    let mut fields = spot_fields("Bobst Library", "Library");
    fields[5] = ("noise_level", "Silent");
    let res = app
        .post_multipart(&format!("/edit/{}", spot), &fields, None, Some(&moderator))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["data"]["name"], "Bobst Library");
    assert_eq!(res.body["data"]["noise_level"], "Silent");
    // rating untouched
    assert_eq!(res.body["data"]["average_star"], 2.0);
    assert_eq!(res.body["data"]["review_count"], 1);
}

#[tokio::test]
async fn test_search() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;
    app.create_spot(&token, "Bobst", "Library").await;
    app.create_spot(&token, "Think Coffee", "Cafe/Restaurant").await;
    app.create_spot(&token, "Think Coffee 2", "Cafe/Restaurant").await;

    let res = app.post_form("/search", &[], None).await;
    assert_eq!(res.status, StatusCode::OK);
    let all = res.body["data"].as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0]["name"], "Think Coffee 2");

    let res = app
        .post_form("/search", &[("name", "Think Coffee"), ("spot_type", "---")], None)
        .await;
    let hits = res.body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Think Coffee");

    let res = app
        .post_form("/search", &[("spot_type", "Cafe/Restaurant"), ("purchase_required", "no")], None)
        .await;
    assert_eq!(res.body["data"].as_array().unwrap().len(), 2);

    let res = app
        .post_form("/search", &[("purchase_required", "sometimes")], None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_back_to_back_spots_keep_creation_order() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;
    let names: Vec<String> = (0..8).map(|i| format!("Spot {i}")).collect();
    for name in &names {
        app.create_spot(&token, name, "Library").await;
    }
    let newest_first: Vec<&str> = names.iter().rev().map(String::as_str).collect();

    let res = app.get("/", None).await;
    let listed: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(listed, newest_first);

    let res = app.post_form("/search", &[("spot_type", "Library")], None).await;
    let found: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(found, newest_first);
}

#[tokio::test]
async fn test_login_errors_are_uniform() {
    let app = spawn().await;
    app.signup("ak8257").await;

    let wrong = app.login("ak8257", "not-the-password").await;
    let unknown = app.login("nobody", "not-the-password").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["message"], unknown.body["message"]);

    let ok = app.login("ak8257", "correct-horse").await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["data"]["user"]["is_moderator"], false);
}

#[tokio::test]
async fn test_signup_duplicate_and_validation() {
    let app = spawn().await;
    app.signup("ak8257").await;

    let res = app
        .post_form("/signup", &[("username", "ak8257"), ("password", "another-pass")], None)
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "Username already taken");

    let res = app
        .post_form("/signup", &[("username", "x"), ("password", "another-pass")], None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post_form("/signup", &[("username", "newbie"), ("password", "short")], None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_cookie_and_logout() {
    let app = spawn().await;
    let res = app.login(common::MODERATOR.0, common::MODERATOR.1).await;
    let set_cookie = res.headers[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let token = app.signup("ak8257").await;
    let spot = app.create_spot(&token, "Bobst", "Library").await;

    // cookie alone is enough to act as the moderator
    let request = Request::get(format!("/edit/{}", spot))
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(request).await.status, StatusCode::OK);

    let res = app.get("/logout", None).await;
    assert_eq!(res.status, StatusCode::OK);
    let cleared = res.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_bad_token_rejected() {
    let app = spawn().await;
    let res = app
        .post_multipart("/create", &spot_fields("Bobst", "Library"), None, Some("garbage"))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], "E3002");
}

#[tokio::test]
async fn test_image_upload_and_serve() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;
    let png = png_bytes();

    let res = app
        .post_multipart(
            "/create",
            &spot_fields("Bobst", "Library"),
            Some(("../../my desk.png", &png)),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    let image_ref = res.body["data"]["image_ref"].as_str().unwrap().to_string();
    assert!(image_ref.ends_with("_my_desk.png"));
    assert!(!image_ref.contains('/'));

    let res = app.get(&format!("/uploads/{}", image_ref), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(res.raw, png);

    let res = app.get("/uploads/..%2Fdatabase", None).await;
    assert_ne!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_image_bad_extension_rejected() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;

    let res = app
        .post_multipart(
            "/create",
            &spot_fields("Bobst", "Library"),
            Some(("photo.gif", &png_bytes())),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["data"]["name"], "Bobst");

    let listed = app.get("/", None).await;
    assert!(listed.body["data"].as_array().unwrap().is_empty());
    let stored = std::fs::read_dir(app.state.config.uploads_dir()).unwrap().count();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_edit_of_deleted_spot_leaves_no_image() {
    let app = spawn().await;
    let token = app.signup("ak8257").await;
    let moderator = app.moderator_token().await;
    let spot = app.create_spot(&token, "Bobst", "Library").await;

    let res = app
        .post_form("/moderator_home", &[("spot_id", spot.as_str())], Some(&moderator))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .post_multipart(
            &format!("/edit/{}", spot),
            &spot_fields("Bobst", "Library"),
            Some(("desk.png", &png_bytes())),
            Some(&moderator),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    let stored = std::fs::read_dir(app.state.config.uploads_dir()).unwrap().count();
    assert_eq!(stored, 0);

    // an identical image already used by a live spot survives the failed edit
    let res = app
        .post_multipart(
            "/create",
            &spot_fields("Kimmel", "Academic building"),
            Some(("desk.png", &png_bytes())),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let res = app
        .post_multipart(
            &format!("/edit/{}", spot),
            &spot_fields("Bobst", "Library"),
            Some(("desk.png", &png_bytes())),
            Some(&moderator),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    let stored = std::fs::read_dir(app.state.config.uploads_dir()).unwrap().count();
    assert_eq!(stored, 1);
}
