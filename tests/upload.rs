mod common;

use local_chef_bazaar::client::{error::ClientError, upload::ImageHost};

#[tokio::test]
async fn uploads_return_a_public_url() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let bazaar = common::client(&server).await;
    let host = bazaar.image_host();

    let url = host.upload("pasta.jpg", vec![0xff, 0xd8, 0xff, 0xe0]).await?;
    assert!(url.starts_with("https://"));
    assert!(url.ends_with("/pasta.jpg"));
    Ok(())
}

#[tokio::test]
async fn empty_files_are_rejected_before_upload() {
    let server = common::spawn_backend().await;
    let bazaar = common::client(&server).await;

    let err = bazaar
        .image_host()
        .upload("empty.jpg", Vec::new())
        .await
        .expect_err("empty file");
    let ClientError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.get("image"), Some("Please choose an image"));
}
