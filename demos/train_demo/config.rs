//! Configuration struct for the train demo.
//!
//! [`TrainConfig`] is a plain struct; its [`Schema`] is declared once in a
//! static and the [`RootConfig`] impl converts between the two.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;

use rootconfig::{
    DeclaredType, FieldDescriptor, Kind, Record, RootConfig, RootConfigError, Schema, Value,
};

/// Hyper-parameters for a (pretend) training run.
#[derive(Debug)]
pub struct TrainConfig {
    pub batch_size: i64,
    pub lpf_pole: Complex64,
    pub learning_rates: Vec<BigDecimal>,
    pub optimizer: String,
    pub debug: bool,
    pub random_seed: i64,
    pub model_version: i64,
    pub dataset_path: PathBuf,
    pub ratios: Vec<BigRational>,
}

fn default_dataset_path() -> Value {
    Value::Path(std::env::temp_dir().join("datasets"))
}

fn default_ratios() -> Value {
    Value::List(vec![Value::Rational(BigRational::new(
        BigInt::from(1),
        BigInt::from(3),
    ))])
}

static SCHEMA: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    Arc::new(
        Schema::builder("train-demo")
            .doc("Hyper-parameters for a training run.")
            .field(FieldDescriptor::new("batch_size", Kind::Integer).help("Samples per step."))
            .field(FieldDescriptor::new("lpf_pole", Kind::Complex).help("Low-pass filter pole."))
            .field(
                FieldDescriptor::new("learning_rates", DeclaredType::list_of(Kind::Decimal))
                    .help("Learning rate schedule, one value per epoch."),
            )
            .field(FieldDescriptor::new(
                "optimizer",
                DeclaredType::choice(["Adam", "AdamW", "RMSProp"]),
            ))
            .field(
                FieldDescriptor::new("debug", Kind::Boolean)
                    .default_value(false)
                    .keyword_only(),
            )
            .field(
                FieldDescriptor::new("random_seed", Kind::Integer)
                    .default_value(1i64)
                    .keyword_only(),
            )
            .field(
                FieldDescriptor::new("model_version", DeclaredType::choice([1i64, 2, 3]))
                    .default_value(2i64)
                    .keyword_only(),
            )
            .field(
                FieldDescriptor::new("dataset_path", Kind::Path)
                    .default_factory(default_dataset_path)
                    .keyword_only(),
            )
            .field(
                FieldDescriptor::new("ratios", DeclaredType::list_of(Kind::Rational))
                    .default_factory(default_ratios)
                    .keyword_only(),
            )
            .build(),
    )
});

impl RootConfig for TrainConfig {
    fn schema() -> Arc<Schema> {
        Arc::clone(&SCHEMA)
    }

    fn from_record(record: &Record) -> Result<Self, RootConfigError> {
        Ok(Self {
            batch_size: record.extract("batch_size")?,
            lpf_pole: record.extract("lpf_pole")?,
            learning_rates: record.extract("learning_rates")?,
            optimizer: record.extract("optimizer")?,
            debug: record.extract("debug")?,
            random_seed: record.extract("random_seed")?,
            model_version: record.extract("model_version")?,
            dataset_path: record.extract("dataset_path")?,
            ratios: record.extract("ratios")?,
        })
    }

    fn to_record(&self) -> Result<Record, RootConfigError> {
        Record::builder(Self::schema())
            .set("batch_size", self.batch_size)
            .set("lpf_pole", self.lpf_pole)
            .set("learning_rates", self.learning_rates.clone())
            .set("optimizer", self.optimizer.as_str())
            .set("debug", self.debug)
            .set("random_seed", self.random_seed)
            .set("model_version", self.model_version)
            .set("dataset_path", self.dataset_path.clone())
            .set("ratios", self.ratios.clone())
            .build()
    }
}
