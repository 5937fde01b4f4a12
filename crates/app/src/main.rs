//! Apothecary Application CLI

use std::{process, sync::Arc};

use apothecary::{
    ledger::EntryType,
    membership::{MembershipStatus, Tier},
    orders::{OrderStatus, Signature},
};
use apothecary_app::{
    context::AppContext,
    domain::{
        customers::{data::NewCustomer, records::CustomerUuid},
        memberships::{
            data::{NewMembership, PointsAdjustment},
            records::MembershipUuid,
        },
        orders::{data::NewOrder, records::OrderUuid},
    },
    notify::{LogNotifier, templates},
};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "apothecary-app", about = "Apothecary CLI", long_about = None)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Customer(CustomerCommand),
    Membership(MembershipCommand),
    Order(OrderCommand),
}

#[derive(Debug, Args)]
struct CustomerCommand {
    #[command(subcommand)]
    command: CustomerSubcommand,
}

#[derive(Debug, Subcommand)]
enum CustomerSubcommand {
    Create(CreateCustomerArgs),
}

#[derive(Debug, Args)]
struct CreateCustomerArgs {
    /// Customer display name
    #[arg(long)]
    name: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// Contact phone
    #[arg(long)]
    phone: Option<String>,

    /// Postal address
    #[arg(long)]
    address: Option<String>,
}

#[derive(Debug, Args)]
struct MembershipCommand {
    #[command(subcommand)]
    command: MembershipSubcommand,
}

#[derive(Debug, Subcommand)]
enum MembershipSubcommand {
    Enroll(EnrollArgs),
    Earn(PointsArgs),
    Redeem(PointsArgs),
    Ledger(MembershipRef),
    Show(ShowMembershipArgs),
    SetStatus(SetStatusArgs),
}

#[derive(Debug, Args)]
struct EnrollArgs {
    /// Customer UUID to enroll
    #[arg(long)]
    customer_uuid: Uuid,

    /// Benefits tier: bronze, silver or gold
    #[arg(long, default_value = "bronze")]
    tier: Tier,

    /// Starting points balance
    #[arg(long, default_value_t = 0)]
    initial_points: u32,
}

#[derive(Debug, Args)]
struct PointsArgs {
    /// Membership UUID
    #[arg(long)]
    membership_uuid: Uuid,

    /// Points magnitude
    #[arg(long)]
    points: u32,

    /// Free-text ledger description
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct MembershipRef {
    /// Membership UUID
    #[arg(long)]
    membership_uuid: Uuid,
}

#[derive(Debug, Args)]
struct ShowMembershipArgs {
    /// Membership code, e.g. MEM-123456
    #[arg(long)]
    code: String,
}

#[derive(Debug, Args)]
struct SetStatusArgs {
    /// Membership UUID
    #[arg(long)]
    membership_uuid: Uuid,

    /// Account status: active, inactive or suspended
    #[arg(long)]
    status: MembershipStatus,
}

#[derive(Debug, Args)]
struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    Submit(SubmitOrderArgs),
    Verify(VerifyArgs),
    Advance(AdvanceArgs),
    Complete(CompleteArgs),
    Cancel(OrderRef),
    List,
}

#[derive(Debug, Args)]
struct SubmitOrderArgs {
    /// Customer name
    #[arg(long)]
    name: String,

    /// Customer phone
    #[arg(long)]
    phone: String,

    /// Customer email
    #[arg(long)]
    email: Option<String>,

    /// Requested medicine
    #[arg(long)]
    medicine: String,

    /// Requested quantity
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Free-text notes
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Debug, Args)]
struct VerifyArgs {
    /// Pickup code, matched after trimming and uppercasing
    #[arg(long)]
    pickup_code: String,
}

#[derive(Debug, Args)]
struct AdvanceArgs {
    /// Order UUID
    #[arg(long)]
    order_uuid: Uuid,

    /// Target status: processing or ready; completed only once a signature
    /// has been captured
    #[arg(long)]
    status: OrderStatus,
}

#[derive(Debug, Args)]
struct CompleteArgs {
    /// Order UUID
    #[arg(long)]
    order_uuid: Uuid,

    /// Base64 proof-of-pickup payload, optionally a data URL
    #[arg(long)]
    signature: String,
}

#[derive(Debug, Args)]
struct OrderRef {
    /// Order UUID
    #[arg(long)]
    order_uuid: Uuid,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let database_url = cli
        .database_url
        .ok_or_else(|| "DATABASE_URL is not set".to_string())?;

    let context = AppContext::from_database_url(&database_url, Arc::new(LogNotifier))
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

    match cli.command {
        Commands::Customer(CustomerCommand {
            command: CustomerSubcommand::Create(args),
        }) => create_customer(&context, args).await,
        Commands::Membership(MembershipCommand { command }) => match command {
            MembershipSubcommand::Enroll(args) => enroll(&context, args).await,
            MembershipSubcommand::Earn(args) => adjust(&context, EntryType::Earned, args).await,
            MembershipSubcommand::Redeem(args) => adjust(&context, EntryType::Redeemed, args).await,
            MembershipSubcommand::Ledger(args) => ledger(&context, args).await,
            MembershipSubcommand::Show(args) => show_membership(&context, args).await,
            MembershipSubcommand::SetStatus(args) => set_status(&context, args).await,
        },
        Commands::Order(OrderCommand { command }) => match command {
            OrderSubcommand::Submit(args) => submit_order(&context, args).await,
            OrderSubcommand::Verify(args) => verify_order(&context, args).await,
            OrderSubcommand::Advance(args) => advance_order(&context, args).await,
            OrderSubcommand::Complete(args) => complete_order(&context, args).await,
            OrderSubcommand::Cancel(args) => cancel_order(&context, args).await,
            OrderSubcommand::List => list_orders(&context).await,
        },
    }
}

async fn create_customer(context: &AppContext, args: CreateCustomerArgs) -> Result<(), String> {
    let customer = context
        .customers
        .create_customer(NewCustomer {
            uuid: CustomerUuid::new(),
            full_name: args.name,
            email: args.email,
            phone: args.phone,
            address: args.address,
        })
        .await
        .map_err(|error| format!("failed to create customer: {error}"))?;

    println!("customer_uuid: {}", customer.uuid);
    println!("email: {}", customer.email);

    Ok(())
}

async fn enroll(context: &AppContext, args: EnrollArgs) -> Result<(), String> {
    let customer_uuid = CustomerUuid::from_uuid(args.customer_uuid);

    let membership = context
        .memberships
        .enroll(NewMembership {
            uuid: MembershipUuid::new(),
            customer_uuid,
            tier: args.tier,
            initial_points: args.initial_points,
        })
        .await
        .map_err(|error| format!("failed to enroll: {error}"))?;

    let customer = context
        .customers
        .get_customer(customer_uuid)
        .await
        .map_err(|error| format!("failed to load customer: {error}"))?;

    if let Some(phone) = &customer.phone {
        let receipt = templates::membership_enrolled(
            &customer.full_name,
            &membership.code,
            membership.tier.as_str(),
        );

        if let Err(error) = context.notifier.send(phone, &receipt).await {
            eprintln!("failed to send enrollment receipt: {error}");
        }
    }

    println!("membership_uuid: {}", membership.uuid);
    println!("code: {}", membership.code);
    println!("tier: {}", membership.tier.as_str());
    println!("points_balance: {}", membership.points_balance);

    Ok(())
}

async fn adjust(
    context: &AppContext,
    entry_type: EntryType,
    args: PointsArgs,
) -> Result<(), String> {
    let membership = context
        .memberships
        .adjust_points(
            MembershipUuid::from_uuid(args.membership_uuid),
            PointsAdjustment {
                entry_type,
                points: args.points,
                description: args.description,
                order_uuid: None,
            },
        )
        .await
        .map_err(|error| format!("failed to adjust points: {error}"))?;

    println!("points_balance: {}", membership.points_balance);

    Ok(())
}

async fn ledger(context: &AppContext, args: MembershipRef) -> Result<(), String> {
    let entries = context
        .memberships
        .ledger(MembershipUuid::from_uuid(args.membership_uuid))
        .await
        .map_err(|error| format!("failed to read ledger: {error}"))?;

    for entry in entries {
        println!(
            "{} {} {} {}",
            entry.created_at,
            entry.entry_type.as_str(),
            entry.points,
            entry.description.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

async fn show_membership(context: &AppContext, args: ShowMembershipArgs) -> Result<(), String> {
    let membership = context
        .memberships
        .find_by_code(&args.code)
        .await
        .map_err(|error| format!("failed to find membership: {error}"))?;

    println!("membership_uuid: {}", membership.uuid);
    println!("customer_uuid: {}", membership.customer_uuid);
    println!("tier: {}", membership.tier.as_str());
    println!("status: {}", membership.status.as_str());
    println!("points_balance: {}", membership.points_balance);

    Ok(())
}

async fn set_status(context: &AppContext, args: SetStatusArgs) -> Result<(), String> {
    let membership = context
        .memberships
        .set_status(MembershipUuid::from_uuid(args.membership_uuid), args.status)
        .await
        .map_err(|error| format!("failed to set status: {error}"))?;

    println!("status: {}", membership.status.as_str());

    Ok(())
}

async fn submit_order(context: &AppContext, args: SubmitOrderArgs) -> Result<(), String> {
    let order = context
        .orders
        .submit_order(NewOrder {
            uuid: OrderUuid::new(),
            customer_name: args.name,
            customer_phone: args.phone,
            customer_email: args.email,
            medicine_name: args.medicine,
            quantity: args.quantity,
            notes: args.notes,
        })
        .await
        .map_err(|error| format!("failed to submit order: {error}"))?;

    println!("order_uuid: {}", order.uuid);
    println!("pickup_code: {}", order.pickup_code);
    println!("status: {}", order.status);

    Ok(())
}

async fn verify_order(context: &AppContext, args: VerifyArgs) -> Result<(), String> {
    let order = context
        .orders
        .lookup(&args.pickup_code)
        .await
        .map_err(|error| format!("failed to verify pickup code: {error}"))?;

    println!("order_uuid: {}", order.uuid);
    println!("customer_name: {}", order.customer_name);
    println!("medicine_name: {}", order.medicine_name);
    println!("quantity: {}", order.quantity);
    println!("status: {}", order.status);
    println!("signature_captured: {}", order.has_signature());

    Ok(())
}

async fn advance_order(context: &AppContext, args: AdvanceArgs) -> Result<(), String> {
    let order = context
        .orders
        .advance(OrderUuid::from_uuid(args.order_uuid), args.status)
        .await
        .map_err(|error| format!("failed to advance order: {error}"))?;

    println!("status: {}", order.status);

    Ok(())
}

async fn complete_order(context: &AppContext, args: CompleteArgs) -> Result<(), String> {
    let signature = Signature::new(args.signature)
        .map_err(|error| format!("invalid signature payload: {error}"))?;

    let order = context
        .orders
        .complete(OrderUuid::from_uuid(args.order_uuid), signature)
        .await
        .map_err(|error| format!("failed to complete order: {error}"))?;

    println!("status: {}", order.status);

    Ok(())
}

async fn cancel_order(context: &AppContext, args: OrderRef) -> Result<(), String> {
    let order = context
        .orders
        .cancel(OrderUuid::from_uuid(args.order_uuid))
        .await
        .map_err(|error| format!("failed to cancel order: {error}"))?;

    println!("status: {}", order.status);

    Ok(())
}

async fn list_orders(context: &AppContext) -> Result<(), String> {
    let orders = context
        .orders
        .list_orders()
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    for order in orders {
        println!(
            "{} {} {} {}x {}",
            order.uuid, order.pickup_code, order.status, order.quantity, order.medicine_name,
        );
    }

    Ok(())
}
