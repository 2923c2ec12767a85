mod common;

use jolly::{Job, JobFilter, JollyError, JollyResult, NewJob, SqlValue, UpdateData};
use rust_decimal::Decimal;

fn titles(jobs: &[Job]) -> Vec<&str> {
    jobs.iter().map(|j| j.title.as_str()).collect()
}

#[tokio::test]
async fn create_and_get() -> JollyResult<()> {
    let Some(client) = common::seeded_client("create_and_get").await? else {
        return Ok(());
    };

    let new = NewJob {
        title: "new".into(),
        salary: Some(100),
        equity: Some(Decimal::new(5, 1)),
        company_handle: "c2".into(),
    };
    let job = Job::create(&client, &new).await?;
    assert_eq!(job.title, "new");
    assert_eq!(job.equity, Some(Decimal::new(5, 1)));

    let fetched = Job::get(&client, job.id).await?;
    assert_eq!(fetched, job);

    let err = Job::get(&client, 0).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Not found: No job: 0");
    Ok(())
}

#[tokio::test]
async fn create_for_unknown_company_is_bad_request() -> JollyResult<()> {
    let Some(client) = common::seeded_client("create_for_unknown_company_is_bad_request").await?
    else {
        return Ok(());
    };

    let new = NewJob {
        title: "orphan".into(),
        salary: None,
        equity: None,
        company_handle: "nope".into(),
    };
    let err = Job::create(&client, &new).await.unwrap_err();
    assert!(matches!(err, JollyError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn find_all_filters() -> JollyResult<()> {
    let Some(client) = common::seeded_client("find_all_filters").await? else {
        return Ok(());
    };

    let all = Job::find_all(&client, &JobFilter::default()).await?;
    assert_eq!(titles(&all), ["j1", "j2", "j3"]);

    let filter = JobFilter {
        title: Some("j".into()),
        min_salary: Some(1500),
        has_equity: None,
    };
    assert_eq!(titles(&Job::find_all(&client, &filter).await?), ["j2", "j3"]);

    let filter = JobFilter {
        has_equity: Some(true),
        ..Default::default()
    };
    assert_eq!(titles(&Job::find_all(&client, &filter).await?), ["j1", "j2"]);

    let filter = JobFilter {
        min_salary: Some(2500),
        has_equity: Some(true),
        ..Default::default()
    };
    assert!(Job::find_all(&client, &filter).await?.is_empty());

    let filter = JobFilter {
        has_equity: Some(false),
        ..Default::default()
    };
    assert_eq!(Job::find_all(&client, &filter).await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn update_keeps_company_and_unlisted_fields() -> JollyResult<()> {
    let Some(client) = common::seeded_client("update_keeps_company_and_unlisted_fields").await?
    else {
        return Ok(());
    };
    let id = common::job_id(&client, "j1").await?;

    let data = UpdateData::new().set("title", "New").set("equity", "0.5");
    let job = Job::update(&client, id, &data).await?;
    assert_eq!(job.title, "New");
    assert_eq!(job.salary, Some(1000));
    assert_eq!(job.equity, Some(Decimal::new(5, 1)));
    assert_eq!(job.company_handle, "c1");

    let data = UpdateData::new().set("salary", SqlValue::Null).set("equity", SqlValue::Null);
    let job = Job::update(&client, id, &data).await?;
    assert_eq!(job.salary, None);
    assert_eq!(job.equity, None);

    let err = Job::update(&client, 0, &UpdateData::new().set("title", "x"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = Job::update(&client, id, &UpdateData::new()).await.unwrap_err();
    assert!(matches!(err, JollyError::EmptyInput));
    Ok(())
}

#[tokio::test]
async fn remove() -> JollyResult<()> {
    let Some(client) = common::seeded_client("remove").await? else {
        return Ok(());
    };
    let id = common::job_id(&client, "j1").await?;

    Job::remove(&client, id).await?;
    assert!(Job::get(&client, id).await.unwrap_err().is_not_found());
    assert!(Job::remove(&client, id).await.unwrap_err().is_not_found());
    Ok(())
}
