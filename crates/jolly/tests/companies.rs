mod common;

use jolly::{
    Company, CompanyFilter, JollyError, JollyResult, NewCompany, SqlValue, TracedClient,
    UpdateData,
};
use rust_decimal::Decimal;

fn names(companies: &[Company]) -> Vec<&str> {
    companies.iter().map(|c| c.handle.as_str()).collect()
}

#[tokio::test]
async fn create_then_reject_duplicate() -> JollyResult<()> {
    let Some(client) = common::seeded_client("create_then_reject_duplicate").await? else {
        return Ok(());
    };

    let new = NewCompany {
        handle: "new".into(),
        name: "New".into(),
        description: "New Description".into(),
        num_employees: Some(1),
        logo_url: Some("http://new.img".into()),
    };
    let company = Company::create(&client, &new).await?;
    assert_eq!(company.handle, "new");
    assert_eq!(company.num_employees, Some(1));

    let err = Company::create(&client, &new).await.unwrap_err();
    assert!(matches!(err, JollyError::BadRequest(_)));
    assert_eq!(err.to_string(), "Bad request: Duplicate company: new");

    let same_name = NewCompany {
        handle: "new2".into(),
        ..new
    };
    let err = Company::create(&client, &same_name).await.unwrap_err();
    assert!(matches!(err, JollyError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn find_all_filters() -> JollyResult<()> {
    let Some(client) = common::seeded_client("find_all_filters").await? else {
        return Ok(());
    };

    let all = Company::find_all(&client, &CompanyFilter::default()).await?;
    assert_eq!(names(&all), ["c1", "c2", "c3"]);

    let filter = CompanyFilter {
        name: Some("c".into()),
        min_employees: Some(2),
        max_employees: Some(3),
    };
    let some = Company::find_all(&client, &filter).await?;
    assert_eq!(names(&some), ["c2", "c3"]);

    let filter = CompanyFilter {
        name: Some("1".into()),
        ..Default::default()
    };
    assert_eq!(names(&Company::find_all(&client, &filter).await?), ["c1"]);

    let filter = CompanyFilter {
        max_employees: Some(0),
        ..Default::default()
    };
    assert!(Company::find_all(&client, &filter).await?.is_empty());

    let filter = CompanyFilter {
        min_employees: Some(3),
        max_employees: Some(1),
        ..Default::default()
    };
    let err = Company::find_all(&client, &filter).await.unwrap_err();
    assert!(matches!(err, JollyError::InvalidRange { .. }));
    Ok(())
}

#[tokio::test]
async fn get_includes_jobs() -> JollyResult<()> {
    let Some(client) = common::seeded_client("get_includes_jobs").await? else {
        return Ok(());
    };

    let detail = Company::get(&client, "c1").await?;
    assert_eq!(detail.company.name, "C1");
    let titles: Vec<&str> = detail.jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, ["j1", "j2"]);
    assert_eq!(detail.jobs[0].equity, Some(Decimal::new(1, 1)));

    let detail = Company::get(&client, "c2").await?;
    assert!(detail.jobs.is_empty());

    let err = Company::get(&client, "nope").await.unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn update_changes_only_given_fields() -> JollyResult<()> {
    let Some(client) = common::seeded_client("update_changes_only_given_fields").await? else {
        return Ok(());
    };

    let data: UpdateData = serde_json::from_str(
        r#"{"name": "New", "description": "New Description", "numEmployees": null, "logoUrl": null}"#,
    )
    .expect("valid json");
    let company = Company::update(&client, "c1", &data).await?;
    assert_eq!(company.name, "New");
    assert_eq!(company.num_employees, None);
    assert_eq!(company.logo_url, None);

    let data = UpdateData::new().set("numEmployees", 10);
    let company = Company::update(&client, "c2", &data).await?;
    assert_eq!(company.num_employees, Some(10));
    assert_eq!(company.name, "C2");
    assert_eq!(company.logo_url.as_deref(), Some("http://c2.img"));

    let err = Company::update(&client, "nope", &data).await.unwrap_err();
    assert!(err.is_not_found());

    let err = Company::update(&client, "c1", &UpdateData::new()).await.unwrap_err();
    assert!(matches!(err, JollyError::EmptyInput));

    let err = Company::update(&client, "c1", &UpdateData::new().set("handle", "c9"))
        .await
        .unwrap_err();
    assert!(matches!(err, JollyError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn remove_cascades_to_jobs() -> JollyResult<()> {
    let Some(client) = common::seeded_client("remove_cascades_to_jobs").await? else {
        return Ok(());
    };

    Company::remove(&client, "c1").await?;
    let err = Company::get(&client, "c1").await.unwrap_err();
    assert!(err.is_not_found());

    let row = client
        .query_one("SELECT count(*) FROM jobs WHERE company_handle = 'c1'", &[])
        .await?;
    assert_eq!(row.get::<_, i64>(0), 0);

    let err = Company::remove(&client, "c1").await.unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn works_through_traced_client_and_transaction() -> JollyResult<()> {
    let Some(mut client) = common::seeded_client("works_through_traced_client_and_transaction").await?
    else {
        return Ok(());
    };

    {
        let tx = client.transaction().await?;
        let data = UpdateData::new().set("logoUrl", SqlValue::Null);
        Company::update(&tx, "c3", &data).await?;
        tx.rollback().await?;
    }

    let traced = TracedClient::new(&client);
    let detail = Company::get(&traced, "c3").await?;
    assert_eq!(detail.company.logo_url.as_deref(), Some("http://c3.img"));
    Ok(())
}
