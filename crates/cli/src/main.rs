use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use voyamed_core::{JourneyService, JourneySession, JourneyStage, SearchService};
use voyamed_store::{
    BookingsRepo, DestinationsRepo, HttpBackend, JourneysRepo, NewBooking, NewSupportTicket,
    SupportTicketsRepo, TreatmentsRepo,
};

#[derive(Parser)]
#[command(name = "voyamed")]
#[command(about = "Voyamed medical-tourism booking CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all destinations
    Destinations,
    /// List all treatments
    Treatments,
    /// Search destinations and treatments
    Search {
        /// Free-text query (minimum 2 characters)
        query: String,
    },
    /// Create a booking
    Book {
        /// User identifier
        user_id: String,
        /// Destination identifier
        destination_id: String,
        /// Treatment identifier
        treatment_id: String,
        /// Booking date (YYYY-MM-DD)
        date: String,
        /// Free-text notes (optional)
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show a user's journey and milestones
    Journey {
        /// User identifier
        user_id: String,
    },
    /// Advance a user's journey to the next stage
    Advance {
        /// User identifier
        user_id: String,
        /// Target stage identifier (must be the legal successor)
        stage: String,
    },
    /// Mark a milestone completed
    CompleteMilestone {
        /// User identifier
        user_id: String,
        /// Milestone identifier
        milestone_id: String,
    },
    /// List a user's support tickets
    Tickets {
        /// User identifier
        user_id: String,
    },
    /// Open a support ticket
    OpenTicket {
        /// User identifier
        user_id: String,
        /// Ticket subject
        subject: String,
        /// Ticket message
        message: String,
    },
}

fn backend_from_env() -> Result<Arc<HttpBackend>, Box<dyn std::error::Error>> {
    let url = std::env::var("VOYAMED_STORE_URL")
        .map_err(|_| "VOYAMED_STORE_URL must be set".to_owned())?;
    let key = std::env::var("VOYAMED_STORE_KEY")
        .map_err(|_| "VOYAMED_STORE_KEY must be set".to_owned())?;
    Ok(Arc::new(HttpBackend::new(&url, &key)?))
}

fn print_journey(session: &JourneySession, journey: &voyamed_store::PatientJourney) {
    println!(
        "Journey for {}: stage {}, step {} of {}",
        session.user_id(),
        journey.journey_stage,
        journey.current_step,
        journey.total_steps
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("No command given; try --help.");
        return Ok(());
    };

    let backend = backend_from_env()?;

    match command {
        Commands::Destinations => {
            let destinations = DestinationsRepo::new(backend).list().await?;
            if destinations.is_empty() {
                println!("No destinations found.");
            } else {
                for destination in destinations {
                    println!(
                        "ID: {}, {} ({}, {}), rating {:.1}",
                        destination.id,
                        destination.name,
                        destination.city,
                        destination.country,
                        destination.rating
                    );
                }
            }
        }
        Commands::Treatments => {
            let treatments = TreatmentsRepo::new(backend).list().await?;
            if treatments.is_empty() {
                println!("No treatments found.");
            } else {
                for treatment in treatments {
                    println!(
                        "ID: {}, {} [{}], {} procedures",
                        treatment.id, treatment.name, treatment.category, treatment.procedure_count
                    );
                }
            }
        }
        Commands::Search { query } => {
            let service = SearchService::new(
                DestinationsRepo::new(backend.clone()),
                TreatmentsRepo::new(backend),
            );
            let results = service.search(&query).await?;
            println!(
                "{} destination(s), {} treatment(s) for \"{}\"",
                results.destination_count(),
                results.treatment_count(),
                results.query
            );
            for destination in &results.destinations {
                println!("  destination: {} ({})", destination.name, destination.country);
            }
            for treatment in &results.treatments {
                println!("  treatment: {} [{}]", treatment.name, treatment.category);
            }
        }
        Commands::Book {
            user_id,
            destination_id,
            treatment_id,
            date,
            notes,
        } => {
            let booking_date: NaiveDate = date.parse()?;
            let booking = BookingsRepo::new(backend)
                .create(NewBooking {
                    user_id,
                    destination_id,
                    treatment_id,
                    booking_date,
                    notes,
                })
                .await?;
            println!("Created booking {} for {}", booking.id, booking.booking_date);
        }
        Commands::Journey { user_id } => {
            let service = JourneyService::new(JourneysRepo::new(backend));
            let session = JourneySession::login(service, &user_id).await?;
            let journey = session.journey().await;
            print_journey(&session, &journey);
            println!("Progress: {}%", session.progress_percentage().await);
            for milestone in session.milestones().await {
                let mark = if milestone.completed { "x" } else { " " };
                println!("  [{}] {} ({})", mark, milestone.title, milestone.id);
            }
            session.logout();
        }
        Commands::Advance { user_id, stage } => {
            let target: JourneyStage = stage.parse()?;
            let service = JourneyService::new(JourneysRepo::new(backend));
            let session = JourneySession::login(service, &user_id).await?;
            match session.advance(target).await {
                Ok(()) => {
                    let journey = session.journey().await;
                    print_journey(&session, &journey);
                }
                Err(e) => eprintln!("Error advancing journey: {}", e),
            }
            session.logout();
        }
        Commands::CompleteMilestone {
            user_id,
            milestone_id,
        } => {
            let service = JourneyService::new(JourneysRepo::new(backend));
            let session = JourneySession::login(service, &user_id).await?;
            match session.complete_milestone(&milestone_id).await {
                Ok(()) => println!("Milestone {} completed.", milestone_id),
                Err(e) => eprintln!("Error completing milestone: {}", e),
            }
            session.logout();
        }
        Commands::Tickets { user_id } => {
            let tickets = SupportTicketsRepo::new(backend).list_for_user(&user_id).await?;
            if tickets.is_empty() {
                println!("No tickets found.");
            } else {
                for ticket in tickets {
                    println!(
                        "ID: {}, {:?}: {} ({})",
                        ticket.id, ticket.status, ticket.subject, ticket.created_at
                    );
                }
            }
        }
        Commands::OpenTicket {
            user_id,
            subject,
            message,
        } => {
            let ticket = SupportTicketsRepo::new(backend)
                .create(NewSupportTicket {
                    user_id,
                    subject,
                    message,
                })
                .await?;
            println!("Opened ticket {}", ticket.id);
        }
    }

    Ok(())
}
