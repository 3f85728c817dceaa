mod support;

use campaign_platform_backend::error::AppError;
use campaign_platform_backend::repositories::EntityStore;
use campaign_platform_shared::constants::{
    ERROR_CAMPAIGN_WINDOW, ERROR_MEMBERS_BELOW_PARTICIPANTS,
};
use campaign_platform_shared::{
    CampaignStatus, CreateCampaignRequest, CreateCommentRequest, CreateReviewRequest,
    FundingContributionRequest, ListCampaignsQuery, RelationKind, ToggleOutcome,
    UpdateCampaignRequest,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use support::*;

fn campaign_request() -> CreateCampaignRequest {
    let start = Utc::now();
    CreateCampaignRequest {
        title: "Saturday plogging".to_string(),
        content: "Jog and pick up litter along the river".to_string(),
        members: 4,
        campaign_start_date: start,
        campaign_end_date: start + Duration::days(10),
        activity_start_date: Some(start + Duration::days(11)),
        activity_end_date: Some(start + Duration::days(12)),
        is_funding: false,
        goal: None,
    }
}

#[tokio::test]
async fn created_campaign_waits_for_approval() {
    let ctx = test_context();
    let owner = Uuid::new_v4();

    let created = ctx
        .services
        .campaigns
        .create_campaign(owner, campaign_request())
        .await
        .unwrap();

    assert_eq!(created.status, CampaignStatus::Unapproved);
    assert_eq!(created.user_id, owner);
    assert!(created.funding.is_none());

    let fetched = ctx.services.campaigns.get_campaign(created.id).await.unwrap();
    assert_eq!(fetched.title, "Saturday plogging");
    assert_eq!(fetched.participant_count, 0);
}

#[tokio::test]
async fn funding_campaign_gets_a_funding_row() {
    let ctx = test_context();
    let mut request = campaign_request();
    request.is_funding = true;
    request.goal = Some(Decimal::from(500_000));

    let created = ctx
        .services
        .campaigns
        .create_campaign(Uuid::new_v4(), request)
        .await
        .unwrap();

    let funding = created.funding.expect("funding row");
    assert_eq!(funding.goal, Decimal::from(500_000));
    assert_eq!(funding.amount, Decimal::ZERO);
    assert!(!funding.goal_reached);
}

#[tokio::test]
async fn inverted_campaign_window_is_rejected_with_its_message() {
    let ctx = test_context();
    let mut request = campaign_request();
    request.campaign_end_date = request.campaign_start_date - Duration::days(1);

    match ctx
        .services
        .campaigns
        .create_campaign(Uuid::new_v4(), request)
        .await
    {
        Err(AppError::Validation(message)) => assert!(message.contains(ERROR_CAMPAIGN_WINDOW)),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn like_toggles_on_and_off_while_recruiting() {
    let ctx = test_context();
    let campaign = seed_campaign(ctx.store.as_ref(), CampaignStatus::Recruiting, 5).await;
    let user = Uuid::new_v4();

    let liked = ctx
        .services
        .campaigns
        .toggle_like(user, campaign.id)
        .await
        .unwrap();
    assert_eq!(liked.outcome, ToggleOutcome::Activated);
    assert_eq!(liked.kind, RelationKind::Like);

    let detail = ctx.services.campaigns.get_campaign(campaign.id).await.unwrap();
    assert_eq!(detail.like_count, 1);

    let unliked = ctx
        .services
        .campaigns
        .toggle_like(user, campaign.id)
        .await
        .unwrap();
    assert_eq!(unliked.outcome, ToggleOutcome::Deactivated);
    assert!(!ctx
        .store
        .exists_relation(user, campaign.id, RelationKind::Like)
        .await
        .unwrap());
}

#[tokio::test]
async fn relations_are_refused_outside_recruiting() {
    let ctx = test_context();
    let user = Uuid::new_v4();

    for status in [
        CampaignStatus::Unapproved,
        CampaignStatus::Ended,
        CampaignStatus::Failed,
    ] {
        let campaign = seed_campaign(ctx.store.as_ref(), status, 5).await;

        let like = ctx.services.campaigns.toggle_like(user, campaign.id).await;
        assert!(matches!(like, Err(AppError::NotRecruiting(_))), "like at {}", status);

        let join = ctx
            .services
            .campaigns
            .toggle_participation(user, campaign.id)
            .await;
        assert!(matches!(join, Err(AppError::NotRecruiting(_))), "join at {}", status);

        let status_now = ctx
            .services
            .campaigns
            .relation_status(user, campaign.id)
            .await
            .unwrap();
        assert!(!status_now.liked);
        assert!(!status_now.participating);
    }
}

#[tokio::test]
async fn full_campaign_rejects_newcomers_but_lets_members_leave() {
    let ctx = test_context();
    let campaign = seed_campaign(ctx.store.as_ref(), CampaignStatus::Recruiting, 2).await;
    let (first, second, third) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    for user in [first, second] {
        let joined = ctx
            .services
            .campaigns
            .toggle_participation(user, campaign.id)
            .await
            .unwrap();
        assert_eq!(joined.outcome, ToggleOutcome::Activated);
    }

    match ctx
        .services
        .campaigns
        .toggle_participation(third, campaign.id)
        .await
    {
        Err(AppError::CapacityExceeded { capacity }) => assert_eq!(capacity, 2),
        other => panic!("unexpected result: {:?}", other),
    }

    let left = ctx
        .services
        .campaigns
        .toggle_participation(first, campaign.id)
        .await
        .unwrap();
    assert_eq!(left.outcome, ToggleOutcome::Deactivated);

    assert_ok!(
        ctx.services
            .campaigns
            .toggle_participation(third, campaign.id)
            .await
    );

    let detail = ctx.services.campaigns.get_campaign(campaign.id).await.unwrap();
    assert_eq!(detail.participant_count, 2);

    let status = ctx
        .services
        .campaigns
        .relation_status(third, campaign.id)
        .await
        .unwrap();
    assert!(status.participating);
}

#[tokio::test]
async fn reviews_require_an_ended_campaign() {
    let ctx = test_context();
    let user = Uuid::new_v4();
    let review = || CreateReviewRequest {
        title: "Great morning".to_string(),
        content: "Collected twelve bags".to_string(),
    };

    let recruiting = seed_campaign(ctx.store.as_ref(), CampaignStatus::Recruiting, 5).await;
    let denied = ctx
        .services
        .campaigns
        .create_review(user, recruiting.id, review())
        .await;
    assert!(matches!(denied, Err(AppError::NotEnded(_))));
    assert!(ctx
        .services
        .campaigns
        .list_reviews(recruiting.id)
        .await
        .unwrap()
        .is_empty());

    let ended = seed_campaign(ctx.store.as_ref(), CampaignStatus::Ended, 5).await;
    let created = ctx
        .services
        .campaigns
        .create_review(user, ended.id, review())
        .await
        .unwrap();

    let reviews = ctx.services.campaigns.list_reviews(ended.id).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].id, created.id);
}

#[tokio::test]
async fn comments_are_not_gated_by_status() {
    let ctx = test_context();
    let campaign = seed_campaign(ctx.store.as_ref(), CampaignStatus::Unapproved, 5).await;

    ctx.services
        .campaigns
        .create_comment(
            Uuid::new_v4(),
            campaign.id,
            CreateCommentRequest {
                content: "When does recruiting open?".to_string(),
            },
        )
        .await
        .unwrap();

    let empty = ctx
        .services
        .campaigns
        .create_comment(
            Uuid::new_v4(),
            campaign.id,
            CreateCommentRequest {
                content: String::new(),
            },
        )
        .await;
    assert!(matches!(empty, Err(AppError::Validation(_))));

    let comments = ctx.services.campaigns.list_comments(campaign.id).await.unwrap();
    assert_eq!(comments.len(), 1);
}

#[tokio::test]
async fn funding_accumulates_until_goal() {
    let ctx = test_context();
    let campaign =
        seed_funding_campaign(ctx.store.as_ref(), CampaignStatus::Recruiting, Decimal::from(1000)).await;
    let backer = Uuid::new_v4();

    let first = ctx
        .services
        .campaigns
        .contribute_funding(
            backer,
            campaign.id,
            FundingContributionRequest {
                amount: Decimal::from(400),
            },
        )
        .await
        .unwrap();
    assert_eq!(first.funding.amount, Decimal::from(400));
    assert!(!first.funding.goal_reached);

    let second = ctx
        .services
        .campaigns
        .contribute_funding(
            backer,
            campaign.id,
            FundingContributionRequest {
                amount: Decimal::from(600),
            },
        )
        .await
        .unwrap();
    assert_eq!(second.funding.amount, Decimal::from(1000));
    assert!(second.funding.goal_reached);
}

#[tokio::test]
async fn funding_is_refused_for_bad_amounts_and_plain_campaigns() {
    let ctx = test_context();
    let user = Uuid::new_v4();

    let funded =
        seed_funding_campaign(ctx.store.as_ref(), CampaignStatus::Recruiting, Decimal::from(1000)).await;
    let zero = ctx
        .services
        .campaigns
        .contribute_funding(
            user,
            funded.id,
            FundingContributionRequest {
                amount: Decimal::ZERO,
            },
        )
        .await;
    assert!(matches!(zero, Err(AppError::Validation(_))));

    let plain = seed_campaign(ctx.store.as_ref(), CampaignStatus::Recruiting, 5).await;
    let not_funding = ctx
        .services
        .campaigns
        .contribute_funding(
            user,
            plain.id,
            FundingContributionRequest {
                amount: Decimal::from(10),
            },
        )
        .await;
    assert!(matches!(not_funding, Err(AppError::Validation(_))));

    let ended =
        seed_funding_campaign(ctx.store.as_ref(), CampaignStatus::Ended, Decimal::from(1000)).await;
    let late = ctx
        .services
        .campaigns
        .contribute_funding(
            user,
            ended.id,
            FundingContributionRequest {
                amount: Decimal::from(10),
            },
        )
        .await;
    assert!(matches!(late, Err(AppError::NotRecruiting(_))));
}

#[tokio::test]
async fn only_the_owner_can_delete_a_campaign() {
    let ctx = test_context();
    let owner = Uuid::new_v4();
    let created = ctx
        .services
        .campaigns
        .create_campaign(owner, campaign_request())
        .await
        .unwrap();

    let stranger = ctx
        .services
        .campaigns
        .delete_campaign(Uuid::new_v4(), created.id)
        .await;
    assert!(matches!(stranger, Err(AppError::Authorization(_))));

    assert_ok!(ctx.services.campaigns.delete_campaign(owner, created.id).await);

    let gone = ctx.services.campaigns.get_campaign(created.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
    assert_err!(ctx.services.campaigns.list_comments(created.id).await);
}

#[tokio::test]
async fn unknown_campaign_is_not_found_everywhere() {
    let ctx = test_context();
    let missing = Uuid::new_v4();
    let user = Uuid::new_v4();

    assert!(matches!(
        ctx.services.campaigns.toggle_like(user, missing).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        ctx.services.campaigns.toggle_participation(user, missing).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        ctx.services.campaigns.relation_status(user, missing).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        ctx.services.campaigns.list_reviews(missing).await,
        Err(AppError::NotFound(_))
    ));
}

fn update_request(members: i32) -> UpdateCampaignRequest {
    let start = Utc::now();
    UpdateCampaignRequest {
        title: "Sunday plogging".to_string(),
        content: "Moved to Sunday, same route".to_string(),
        members,
        campaign_start_date: start,
        campaign_end_date: start + Duration::days(14),
        activity_start_date: None,
        activity_end_date: None,
        goal: None,
    }
}

fn contribution(amount: Decimal) -> FundingContributionRequest {
    FundingContributionRequest { amount }
}

#[tokio::test]
async fn campaigns_are_listed_newest_first_and_filtered_by_status() {
    let ctx = test_context();
    let first = seed_campaign(ctx.store.as_ref(), CampaignStatus::Recruiting, 5).await;
    let second = seed_campaign(ctx.store.as_ref(), CampaignStatus::Ended, 5).await;
    let third = seed_campaign(ctx.store.as_ref(), CampaignStatus::Recruiting, 5).await;
    ctx.services
        .campaigns
        .toggle_participation(Uuid::new_v4(), third.id)
        .await
        .unwrap();

    let all = ctx
        .services
        .campaigns
        .list_campaigns(ListCampaignsQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert!(all
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
    for id in [first.id, second.id] {
        assert!(all.iter().any(|c| c.id == id));
    }
    let joined = all.iter().find(|c| c.id == third.id).unwrap();
    assert_eq!(joined.participant_count, 1);

    let recruiting = ctx
        .services
        .campaigns
        .list_campaigns(ListCampaignsQuery {
            status: Some(CampaignStatus::Recruiting),
        })
        .await
        .unwrap();
    assert_eq!(recruiting.len(), 2);
    assert!(recruiting
        .iter()
        .all(|c| c.status == CampaignStatus::Recruiting));
}

#[tokio::test]
async fn owner_edits_a_campaign() {
    let ctx = test_context();
    let owner = Uuid::new_v4();
    let created = ctx
        .services
        .campaigns
        .create_campaign(owner, campaign_request())
        .await
        .unwrap();

    let updated = ctx
        .services
        .campaigns
        .update_campaign(owner, created.id, update_request(6))
        .await
        .unwrap();
    assert_eq!(updated.title, "Sunday plogging");
    assert_eq!(updated.members, 6);
    assert_eq!(updated.status, CampaignStatus::Unapproved);
    assert!(updated.activity_start_date.is_none());

    let stranger = ctx
        .services
        .campaigns
        .update_campaign(Uuid::new_v4(), created.id, update_request(9))
        .await;
    assert!(matches!(stranger, Err(AppError::Authorization(_))));

    let missing = ctx
        .services
        .campaigns
        .update_campaign(owner, Uuid::new_v4(), update_request(9))
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn capacity_cannot_drop_below_current_participants() {
    let ctx = test_context();
    let owner = Uuid::new_v4();
    let mut seeded = new_campaign(owner, CampaignStatus::Recruiting, 4);
    seeded.title = "Tree planting".to_string();
    let campaign = ctx
        .store
        .create_campaign(seeded, None)
        .await
        .unwrap()
        .campaign;

    for _ in 0..3 {
        ctx.services
            .campaigns
            .toggle_participation(Uuid::new_v4(), campaign.id)
            .await
            .unwrap();
    }

    match ctx
        .services
        .campaigns
        .update_campaign(owner, campaign.id, update_request(2))
        .await
    {
        Err(AppError::Validation(message)) => {
            assert_eq!(message, ERROR_MEMBERS_BELOW_PARTICIPANTS)
        }
        other => panic!("unexpected result: {:?}", other),
    }
    let unchanged = ctx.services.campaigns.get_campaign(campaign.id).await.unwrap();
    assert_eq!(unchanged.members, 4);
    assert_eq!(unchanged.title, "Tree planting");

    let exact = ctx
        .services
        .campaigns
        .update_campaign(owner, campaign.id, update_request(3))
        .await
        .unwrap();
    assert_eq!(exact.members, 3);
    assert_eq!(exact.participant_count, 3);
}

#[tokio::test]
async fn edit_moves_the_funding_goal() {
    let ctx = test_context();
    let owner = Uuid::new_v4();
    let mut request = campaign_request();
    request.is_funding = true;
    request.goal = Some(Decimal::from(1_000));
    let created = ctx
        .services
        .campaigns
        .create_campaign(owner, request)
        .await
        .unwrap();

    let mut edit = update_request(4);
    edit.goal = Some(Decimal::from(5_000));
    let updated = ctx
        .services
        .campaigns
        .update_campaign(owner, created.id, edit)
        .await
        .unwrap();
    assert_eq!(updated.funding.unwrap().goal, Decimal::from(5_000));

    let mut invalid = update_request(4);
    invalid.goal = Some(Decimal::ZERO);
    assert!(matches!(
        ctx.services
            .campaigns
            .update_campaign(owner, created.id, invalid)
            .await,
        Err(AppError::Validation(_))
    ));

    let mut fractional = update_request(4);
    fractional.goal = Some(Decimal::new(10_005, 3));
    assert!(matches!(
        ctx.services
            .campaigns
            .update_campaign(owner, created.id, fractional)
            .await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn only_the_author_changes_a_review() {
    let ctx = test_context();
    let author = Uuid::new_v4();
    let ended = seed_campaign(ctx.store.as_ref(), CampaignStatus::Ended, 5).await;
    let other = seed_campaign(ctx.store.as_ref(), CampaignStatus::Ended, 5).await;
    let review = ctx
        .services
        .campaigns
        .create_review(
            author,
            ended.id,
            CreateReviewRequest {
                title: "Great morning".to_string(),
                content: "Collected twelve bags".to_string(),
            },
        )
        .await
        .unwrap();
    let edit = || CreateReviewRequest {
        title: "Great morning, revised".to_string(),
        content: "Collected fourteen bags".to_string(),
    };

    let stranger = ctx
        .services
        .campaigns
        .update_review(Uuid::new_v4(), ended.id, review.id, edit())
        .await;
    assert!(matches!(stranger, Err(AppError::Authorization(_))));

    let elsewhere = ctx
        .services
        .campaigns
        .update_review(author, other.id, review.id, edit())
        .await;
    assert!(matches!(elsewhere, Err(AppError::NotFound(_))));

    let updated = ctx
        .services
        .campaigns
        .update_review(author, ended.id, review.id, edit())
        .await
        .unwrap();
    assert_eq!(updated.content, "Collected fourteen bags");
    assert!(updated.updated_at >= review.updated_at);

    assert!(matches!(
        ctx.services
            .campaigns
            .delete_review(Uuid::new_v4(), ended.id, review.id)
            .await,
        Err(AppError::Authorization(_))
    ));
    assert_ok!(
        ctx.services
            .campaigns
            .delete_review(author, ended.id, review.id)
            .await
    );
    assert!(ctx.services.campaigns.list_reviews(ended.id).await.unwrap().is_empty());
    assert!(matches!(
        ctx.services
            .campaigns
            .delete_review(author, ended.id, review.id)
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn only_the_author_changes_a_comment() {
    let ctx = test_context();
    let author = Uuid::new_v4();
    let campaign = seed_campaign(ctx.store.as_ref(), CampaignStatus::Recruiting, 5).await;
    let comment = ctx
        .services
        .campaigns
        .create_comment(
            author,
            campaign.id,
            CreateCommentRequest {
                content: "Is parking available?".to_string(),
            },
        )
        .await
        .unwrap();
    let edit = |content: &str| CreateCommentRequest {
        content: content.to_string(),
    };

    assert!(matches!(
        ctx.services
            .campaigns
            .update_comment(Uuid::new_v4(), campaign.id, comment.id, edit("Hijacked"))
            .await,
        Err(AppError::Authorization(_))
    ));
    assert!(matches!(
        ctx.services
            .campaigns
            .update_comment(author, campaign.id, comment.id, edit(""))
            .await,
        Err(AppError::Validation(_))
    ));

    let updated = ctx
        .services
        .campaigns
        .update_comment(author, campaign.id, comment.id, edit("Found the parking lot"))
        .await
        .unwrap();
    assert_eq!(updated.content, "Found the parking lot");

    assert!(matches!(
        ctx.services
            .campaigns
            .delete_comment(author, Uuid::new_v4(), comment.id)
            .await,
        Err(AppError::NotFound(_))
    ));
    assert_ok!(
        ctx.services
            .campaigns
            .delete_comment(author, campaign.id, comment.id)
            .await
    );
    assert!(ctx
        .services
        .campaigns
        .list_comments(campaign.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn funding_total_past_the_money_range_is_rejected() {
    let ctx = test_context();
    let campaign = seed_funding_campaign(
        ctx.store.as_ref(),
        CampaignStatus::Recruiting,
        Decimal::from(1_000),
    )
    .await;
    let backer = Uuid::new_v4();
    let large = Decimal::from(600_000_000_000_000_000i64);

    ctx.services
        .campaigns
        .contribute_funding(backer, campaign.id, contribution(large))
        .await
        .unwrap();
    let overflow = ctx
        .services
        .campaigns
        .contribute_funding(backer, campaign.id, contribution(large))
        .await;
    assert!(matches!(overflow, Err(AppError::Validation(_))));

    let detail = ctx.services.campaigns.get_campaign(campaign.id).await.unwrap();
    assert_eq!(detail.funding.unwrap().amount, large);
}

#[tokio::test]
async fn funding_amounts_must_fit_the_money_column() {
    let ctx = test_context();
    let campaign = seed_funding_campaign(
        ctx.store.as_ref(),
        CampaignStatus::Recruiting,
        Decimal::from(1_000),
    )
    .await;
    let backer = Uuid::new_v4();

    for amount in [Decimal::new(1_005, 3), Decimal::MAX] {
        let result = ctx
            .services
            .campaigns
            .contribute_funding(backer, campaign.id, contribution(amount))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))), "amount {}", amount);
    }

    let trailing_zero = ctx
        .services
        .campaigns
        .contribute_funding(backer, campaign.id, contribution(Decimal::new(1_500, 3)))
        .await
        .unwrap();
    assert_eq!(trailing_zero.funding.amount, Decimal::new(150, 2));

    let mut request = campaign_request();
    request.is_funding = true;
    request.goal = Some(Decimal::from(1_000_000_000_000_000_000i64));
    assert_err!(
        ctx.services
            .campaigns
            .create_campaign(Uuid::new_v4(), request)
            .await
    );
}
