//! End-to-end expense flow over the in-memory adapters: create, submit,
//! approve with budget consumption, threshold alerting, and the alert
//! acknowledgment lifecycle.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use outlay::adapters::memory::{
    InMemoryActionRepository, InMemoryAlertRepository, InMemoryBudgetRepository, InMemoryCache,
    InMemoryDirectory, InMemoryExpenseRepository, InMemoryHistoryRepository,
    InMemoryThresholdRepository, InMemoryWorkflowRepository,
};
use outlay::application::handlers::budget::{
    AcknowledgeAlertCommand, AcknowledgeAlertHandler, BudgetConsumptionTracker,
    CheckAlertsHandler, CreateBudgetCommand, CreateBudgetHandler, CreateThresholdCommand,
    CreateThresholdHandler,
};
use outlay::application::handlers::expense::{
    ApproveExpenseCommand, ApproveExpenseHandler, CreateExpenseCommand, CreateExpenseHandler,
    RejectExpenseCommand, RejectExpenseHandler, SubmitExpenseCommand, SubmitExpenseHandler,
    UpdateExpenseCommand, UpdateExpenseHandler,
};
use outlay::application::handlers::workflow::{
    ApprovalQueries, CreateWorkflowCommand, CreateWorkflowHandler, RecordActionCommand,
    RecordActionHandler, StepRequest,
};
use outlay::domain::budget::BudgetPeriod;
use outlay::domain::expense::{AllocationRequest, ExpenseStatus};
use outlay::domain::foundation::{RoleId, SegmentId, UserId};
use outlay::domain::workflow::ApprovalActionKind;
use outlay::ports::{
    AlertRepository, BudgetRepository, ExpenseRepository, WorkflowHistoryRepository,
};

struct App {
    expenses: Arc<InMemoryExpenseRepository>,
    history: Arc<InMemoryHistoryRepository>,
    budgets: Arc<InMemoryBudgetRepository>,
    alerts: Arc<InMemoryAlertRepository>,
    directory: Arc<InMemoryDirectory>,

    create_expense: CreateExpenseHandler,
    submit_expense: SubmitExpenseHandler,
    approve_expense: ApproveExpenseHandler,
    reject_expense: RejectExpenseHandler,
    update_expense: UpdateExpenseHandler,
    create_workflow: CreateWorkflowHandler,
    record_action: RecordActionHandler,
    queries: ApprovalQueries,
    create_budget: CreateBudgetHandler,
    create_threshold: CreateThresholdHandler,
    check_alerts: CheckAlertsHandler,
    acknowledge: AcknowledgeAlertHandler,
}

fn app() -> App {
    let expenses = Arc::new(InMemoryExpenseRepository::new());
    let history = Arc::new(InMemoryHistoryRepository::new());
    let actions = Arc::new(InMemoryActionRepository::new());
    let workflows = Arc::new(InMemoryWorkflowRepository::new());
    let budgets = Arc::new(InMemoryBudgetRepository::new());
    let thresholds = Arc::new(InMemoryThresholdRepository::new());
    let alerts = Arc::new(InMemoryAlertRepository::new());
    let directory = Arc::new(InMemoryDirectory::new());
    let cache = Arc::new(InMemoryCache::new());

    let tracker = Arc::new(BudgetConsumptionTracker::new(
        budgets.clone(),
        directory.clone(),
        cache,
    ));

    App {
        create_expense: CreateExpenseHandler::new(
            expenses.clone(),
            history.clone(),
            directory.clone(),
        ),
        submit_expense: SubmitExpenseHandler::new(expenses.clone(), history.clone()),
        approve_expense: ApproveExpenseHandler::new(
            expenses.clone(),
            history.clone(),
            tracker,
        ),
        reject_expense: RejectExpenseHandler::new(expenses.clone(), history.clone()),
        update_expense: UpdateExpenseHandler::new(
            expenses.clone(),
            history.clone(),
            directory.clone(),
        ),
        create_workflow: CreateWorkflowHandler::new(workflows.clone(), directory.clone()),
        record_action: RecordActionHandler::new(
            actions.clone(),
            expenses.clone(),
            workflows.clone(),
            directory.clone(),
        ),
        queries: ApprovalQueries::new(actions.clone(), history.clone()),
        create_budget: CreateBudgetHandler::new(budgets.clone(), directory.clone()),
        create_threshold: CreateThresholdHandler::new(
            thresholds.clone(),
            budgets.clone(),
            directory.clone(),
        ),
        check_alerts: CheckAlertsHandler::new(
            thresholds.clone(),
            budgets.clone(),
            alerts.clone(),
        ),
        acknowledge: AcknowledgeAlertHandler::new(alerts.clone()),
        expenses,
        history,
        budgets,
        alerts,
        directory,
    }
}

fn expense_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
}

#[tokio::test]
async fn expense_runs_the_full_approval_and_alerting_cycle() {
    let app = app();

    // Reference data.
    let submitter = UserId::new();
    let approver = UserId::new();
    let finance_role = RoleId::new();
    let seg_a = SegmentId::new();
    let seg_b = SegmentId::new();
    app.directory.register_user(submitter).await;
    app.directory.grant_role(approver, finance_role).await;
    app.directory.register_segment(seg_a, None).await;
    app.directory.register_segment(seg_b, None).await;

    // Budget watching segment A, with an 80% threshold.
    let budget = app
        .create_budget
        .handle(CreateBudgetCommand {
            name: "Segment A FY26".to_string(),
            segment_id: Some(seg_a),
            department_id: None,
            period: BudgetPeriod::Yearly,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            allocated_amount: dec!(700.00),
        })
        .await
        .unwrap();
    app.create_threshold
        .handle(CreateThresholdCommand {
            budget_id: budget.id,
            percentage: dec!(80),
            alert_enabled: true,
            notification_recipients: vec![],
        })
        .await
        .unwrap();

    // One-step workflow resolved by the finance role.
    let workflow = app
        .create_workflow
        .handle(CreateWorkflowCommand {
            name: "Standard expense approval".to_string(),
            description: None,
            trigger_conditions: None,
            steps: vec![StepRequest {
                step_name: Some("Finance review".to_string()),
                step_order: 1,
                approver_role_id: Some(finance_role),
                approver_user_id: None,
                is_mandatory: true,
                condition: None,
            }],
        })
        .await
        .unwrap();
    let step_id = workflow.steps[0].id;

    // Scenario A: 60/40 split of 1000.00.
    let expense = app
        .create_expense
        .handle(CreateExpenseCommand {
            actor: submitter,
            expense_date: expense_date(),
            vendor: Some("Acme Supplies".to_string()),
            total_amount: dec!(1000.00),
            currency: "USD".to_string(),
            description: None,
            allocations: vec![
                AllocationRequest {
                    segment_id: seg_a,
                    percentage: dec!(60),
                    description: None,
                },
                AllocationRequest {
                    segment_id: seg_b,
                    percentage: dec!(40),
                    description: None,
                },
            ],
        })
        .await
        .unwrap();
    assert_eq!(expense.allocations[0].amount.amount(), dec!(600.00));
    assert_eq!(expense.allocations[1].amount.amount(), dec!(400.00));

    // Submit: one history row DRAFT -> SUBMITTED.
    app.submit_expense
        .handle(SubmitExpenseCommand {
            actor: submitter,
            expense_id: expense.id,
        })
        .await
        .unwrap();
    let latest = app
        .queries
        .latest_history(expense.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.from_status, Some(ExpenseStatus::Draft));
    assert_eq!(latest.to_status, ExpenseStatus::Submitted);

    // Approver records the step approval; no lifecycle change implied.
    app.record_action
        .handle(RecordActionCommand {
            actor: approver,
            expense_id: expense.id,
            step_id: Some(step_id),
            kind: ApprovalActionKind::Approved,
            comment: Some("ok".to_string()),
            delegated_to: None,
        })
        .await
        .unwrap();
    assert!(app
        .queries
        .has_approved_at_step(expense.id, step_id)
        .await
        .unwrap());
    let stored = app.expenses.find_by_id(expense.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ExpenseStatus::Submitted);

    // Lifecycle approval applies consumption to the segment-A budget.
    app.approve_expense
        .handle(ApproveExpenseCommand {
            actor: approver,
            expense_id: expense.id,
            comment: None,
        })
        .await
        .unwrap();
    let stored_budget = app.budgets.find_by_id(budget.id).await.unwrap().unwrap();
    assert_eq!(stored_budget.consumed.amount(), dec!(600.00));
    assert_eq!(stored_budget.remaining().amount(), dec!(100.00));
    assert_eq!(stored_budget.utilization(), dec!(85.71));

    // The sweep raises exactly one alert, and repeating it is idempotent.
    assert_eq!(app.check_alerts.handle().await.unwrap(), 1);
    assert_eq!(app.check_alerts.handle().await.unwrap(), 0);

    let open_alerts = app.alerts.find_unacknowledged().await.unwrap();
    assert_eq!(open_alerts.len(), 1);
    assert_eq!(
        open_alerts[0].message,
        "Budget threshold of 80% has been reached"
    );

    // Scenario F: double acknowledgment keeps the first date.
    let first = app
        .acknowledge
        .handle(AcknowledgeAlertCommand {
            alert_id: open_alerts[0].id,
        })
        .await
        .unwrap();
    let second = app
        .acknowledge
        .handle(AcknowledgeAlertCommand {
            alert_id: open_alerts[0].id,
        })
        .await
        .unwrap();
    assert_eq!(second.acknowledged_date, first.acknowledged_date);

    // Acknowledged alert: the still-breached threshold may fire again.
    assert_eq!(app.check_alerts.handle().await.unwrap(), 1);

    // Full history: created, submitted, approved.
    let rows = app.history.find_by_expense(expense.id).await.unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn invalid_split_is_rejected_before_anything_persists() {
    let app = app();
    let submitter = UserId::new();
    let segment = SegmentId::new();
    app.directory.register_user(submitter).await;
    app.directory.register_segment(segment, None).await;

    // Scenario B: 70 + 40 = 110%.
    let result = app
        .create_expense
        .handle(CreateExpenseCommand {
            actor: submitter,
            expense_date: expense_date(),
            vendor: None,
            total_amount: dec!(1000.00),
            currency: "USD".to_string(),
            description: None,
            allocations: vec![
                AllocationRequest {
                    segment_id: segment,
                    percentage: dec!(70),
                    description: None,
                },
                AllocationRequest {
                    segment_id: segment,
                    percentage: dec!(40),
                    description: None,
                },
            ],
        })
        .await;

    assert!(result.is_err());
    assert!(app.expenses.list().await.unwrap().is_empty());
    assert!(app.history.find_by_actor(submitter).await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_expense_can_be_reworked_and_resubmitted() {
    let app = app();
    let submitter = UserId::new();
    let reviewer = UserId::new();
    let segment = SegmentId::new();
    app.directory.register_user(submitter).await;
    app.directory.register_user(reviewer).await;
    app.directory.register_segment(segment, None).await;

    let expense = app
        .create_expense
        .handle(CreateExpenseCommand {
            actor: submitter,
            expense_date: expense_date(),
            vendor: Some("Acme".to_string()),
            total_amount: dec!(200.00),
            currency: "USD".to_string(),
            description: None,
            allocations: vec![AllocationRequest {
                segment_id: segment,
                percentage: dec!(100),
                description: None,
            }],
        })
        .await
        .unwrap();

    app.submit_expense
        .handle(SubmitExpenseCommand {
            actor: submitter,
            expense_id: expense.id,
        })
        .await
        .unwrap();

    app.reject_expense
        .handle(RejectExpenseCommand {
            actor: reviewer,
            expense_id: expense.id,
            reason: "wrong amount".to_string(),
        })
        .await
        .unwrap();

    // Rework: edit returns the expense to Draft, then resubmit.
    app.update_expense
        .handle(UpdateExpenseCommand {
            actor: submitter,
            expense_id: expense.id,
            expense_date: None,
            vendor: None,
            description: None,
            total_amount: Some(dec!(180.00)),
            allocations: Some(vec![AllocationRequest {
                segment_id: segment,
                percentage: dec!(100),
                description: None,
            }]),
        })
        .await
        .unwrap();

    let resubmitted = app
        .submit_expense
        .handle(SubmitExpenseCommand {
            actor: submitter,
            expense_id: expense.id,
        })
        .await
        .unwrap();
    assert_eq!(resubmitted.status, ExpenseStatus::Submitted);
    assert_eq!(resubmitted.total_amount.amount(), dec!(180.00));

    // Draft(create), Submit, Reject, back-to-Draft, Submit again.
    let rows = app.history.find_by_expense(expense.id).await.unwrap();
    assert_eq!(rows.len(), 5);
}
