use clap::{Parser, Subcommand, ValueEnum};
use hms_core::config::data_dir_from_env_value;
use hms_core::{CollectionKey, CoreConfig, EntitySchema, HospitalService, Record};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hms")]
#[command(about = "Hospital records management CLI")]
struct Cli {
    /// Directory holding the collection files (overrides HMS_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Collections managed through the generic record commands.
#[derive(Clone, Copy, ValueEnum)]
enum Entity {
    Patients,
    Doctors,
    Staff,
    Medicines,
    LabTests,
    Machinery,
}

impl From<Entity> for CollectionKey {
    fn from(entity: Entity) -> Self {
        match entity {
            Entity::Patients => CollectionKey::Patients,
            Entity::Doctors => CollectionKey::Doctors,
            Entity::Staff => CollectionKey::Staff,
            Entity::Medicines => CollectionKey::Medicines,
            Entity::LabTests => CollectionKey::LabTests,
            Entity::Machinery => CollectionKey::Machinery,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show dashboard counts
    Summary,
    /// List the records of an entity
    List { entity: Entity },
    /// Add a record
    Add {
        entity: Entity,
        /// Field value as `field=value`, e.g. `--field "test name=CBC"`
        #[arg(long = "field", short = 'f', value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Delete every record whose values equal the given ones, in field order
    Delete { entity: Entity, values: Vec<String> },
    /// List doctors available for appointments
    Doctors,
    /// Book an appointment
    Book {
        patient_name: String,
        doctor: String,
        /// Date (YYYY-MM-DD)
        date: String,
        /// Time (HH:MM)
        time: String,
    },
    /// List appointments
    Appointments,
    /// Delete every appointment equal to the given one
    CancelAppointment {
        patient_name: String,
        doctor: String,
        date: String,
        time: String,
    },
    /// List medicines with their unit prices
    Medicines,
    /// Show the unit price of a medicine
    Price { medicine: String },
    /// Generate a bill
    Bill {
        patient: String,
        medicine: String,
        quantity: String,
    },
    /// List bills
    Bills,
    /// Delete every bill equal to the given one
    DeleteBill {
        patient: String,
        medicine: String,
        quantity: String,
        price: String,
        total: String,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_lowercase(), v.to_string()))
        .ok_or_else(|| format!("expected field=value, got '{raw}'"))
}

fn print_table(schema: &EntitySchema, records: &[Record]) {
    if records.is_empty() {
        println!("No {} records found.", schema.title.to_lowercase());
        return;
    }

    let header: Vec<String> = schema
        .fields
        .iter()
        .map(|f| format!("{:<width$}", f.label, width = usize::from(f.display_width)))
        .collect();
    println!("{}", header.join(" "));
    for record in records {
        let row: Vec<String> = schema
            .fields
            .iter()
            .map(|f| {
                format!(
                    "{:<width$}",
                    record.get(f.name),
                    width = usize::from(f.display_width)
                )
            })
            .collect();
        println!("{}", row.join(" "));
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("hms=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| data_dir_from_env_value(std::env::var("HMS_DATA_DIR").ok()));
    let cfg = Arc::new(CoreConfig::new(data_dir)?);
    let hospital = HospitalService::new(cfg);

    match cli.command {
        Some(Commands::Summary) => {
            let summary = hospital.dashboard().summary()?;
            println!("Patients:       {}", summary.patients);
            println!("Doctors:        {}", summary.doctors);
            println!("Staff:          {}", summary.staff);
            println!("Medicines:      {}", summary.medicines);
            println!("Appointments:   {}", summary.appointments);
            println!("Available Beds: {}", summary.available_beds);
            println!("Machinery:      {}", summary.machinery);
        }
        Some(Commands::List { entity }) => {
            let manager = hospital.records(entity.into());
            print_table(manager.schema(), &manager.list()?);
        }
        Some(Commands::Add { entity, fields }) => {
            let manager = hospital.records(entity.into());
            let candidate: HashMap<String, String> = fields.into_iter().collect();
            let total = manager.add(&candidate)?;
            println!(
                "{} added successfully ({} on record)",
                manager.schema().title,
                total
            );
        }
        Some(Commands::Delete { entity, values }) => {
            let manager = hospital.records(entity.into());
            let removed = manager.delete(values.as_slice())?;
            println!("{} deleted successfully ({} removed)", manager.schema().title, removed);
        }
        Some(Commands::Doctors) => {
            let doctors = hospital.appointments().available_doctors()?;
            if doctors.is_empty() {
                println!("No doctors found.");
            }
            for doctor in doctors {
                println!("{doctor}");
            }
        }
        Some(Commands::Book {
            patient_name,
            doctor,
            date,
            time,
        }) => {
            hospital
                .appointments()
                .book(&patient_name, &doctor, &date, &time)?;
            println!("Appointment booked successfully");
        }
        Some(Commands::Appointments) => {
            let schema = EntitySchema::of(CollectionKey::Appointments);
            print_table(schema, &hospital.records(CollectionKey::Appointments).list()?);
        }
        Some(Commands::CancelAppointment {
            patient_name,
            doctor,
            date,
            time,
        }) => {
            let removed = hospital
                .appointments()
                .delete_selected(&[patient_name, doctor, date, time])?;
            println!("Appointment deleted successfully ({removed} removed)");
        }
        Some(Commands::Medicines) => {
            let prices = hospital.billing().price_list()?;
            if prices.names().is_empty() {
                println!("No medicines found.");
            }
            for name in prices.names() {
                println!("{name}: {}", prices.displayed_price(name).unwrap_or(""));
            }
        }
        Some(Commands::Price { medicine }) => match hospital.billing().price_of(&medicine)? {
            Some(price) => println!("{medicine}: {price}"),
            None => println!("No medicine named '{medicine}'"),
        },
        Some(Commands::Bill {
            patient,
            medicine,
            quantity,
        }) => {
            let bill = hospital
                .billing()
                .generate_bill(&patient, &medicine, &quantity)?;
            println!(
                "Bill generated successfully: {} x {} @ {} = {}",
                bill.medicine, bill.quantity, bill.price, bill.total
            );
        }
        Some(Commands::Bills) => {
            let schema = EntitySchema::of(CollectionKey::Billing);
            print_table(schema, &hospital.records(CollectionKey::Billing).list()?);
        }
        Some(Commands::DeleteBill {
            patient,
            medicine,
            quantity,
            price,
            total,
        }) => {
            let removed = hospital
                .billing()
                .delete_selected(&[patient, medicine, quantity, price, total])?;
            println!("Bill deleted successfully ({removed} removed)");
        }
        None => {
            println!("Use 'hms --help' for commands");
        }
    }

    Ok(())
}
