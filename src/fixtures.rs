#[cfg(test)]
pub mod test {
    use std::str::FromStr;
    use std::sync::{Arc, LazyLock};

    use bigdecimal::BigDecimal;
    use num_bigint::BigInt;
    use num_complex::Complex64;
    use num_rational::BigRational;

    use crate::record::Record;
    use crate::schema::{FieldDescriptor, Schema};
    use crate::types::{DeclaredType, Kind, Value};

    pub fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    pub fn decimal(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    /// A schema with exactly one field.
    pub fn single_field(name: &str, declared: impl Into<DeclaredType>) -> Schema {
        Schema::builder("Single")
            .field(FieldDescriptor::new(name, declared))
            .build()
    }

    fn default_dataset_path() -> Value {
        Value::Path(std::env::temp_dir().join("datasets"))
    }

    fn default_ratios() -> Value {
        Value::List(vec![Value::Rational(ratio(1, 3))])
    }

    static TRAIN_SCHEMA: LazyLock<Arc<Schema>> = LazyLock::new(|| {
        Arc::new(
            Schema::builder("TrainConfig")
                .doc("Hyper-parameters for a training run.")
                .field(FieldDescriptor::new("batch_size", Kind::Integer).help("Samples per step."))
                .field(FieldDescriptor::new("lpf_pole", Kind::Complex))
                .field(FieldDescriptor::new(
                    "learning_rates",
                    DeclaredType::list_of(Kind::Decimal),
                ))
                .field(FieldDescriptor::new(
                    "optimizer",
                    DeclaredType::choice(["Adam", "AdamW", "RMSProp"]),
                ))
                .field(FieldDescriptor::new("debug", Kind::Boolean).default_value(false))
                .field(FieldDescriptor::new("random_seed", Kind::Integer).default_value(1i64))
                .field(
                    FieldDescriptor::new("model_version", DeclaredType::choice([1i64, 2, 3]))
                        .default_value(2i64),
                )
                .field(
                    FieldDescriptor::new("dataset_path", Kind::Path)
                        .default_factory(default_dataset_path),
                )
                .field(
                    FieldDescriptor::new("ratios", DeclaredType::list_of(Kind::Rational))
                        .default_factory(default_ratios),
                )
                .build(),
        )
    });

    /// Nine fields covering every shape: four required, five defaulted.
    pub fn train_schema() -> Arc<Schema> {
        Arc::clone(&TRAIN_SCHEMA)
    }

    /// A fully populated, valid record of [`train_schema`].
    pub fn train_record() -> Record {
        Record::builder(train_schema())
            .set("batch_size", 128i64)
            .set("lpf_pole", Complex64::new(0.5, -2.0))
            .set(
                "learning_rates",
                vec![decimal("1e-2"), decimal("1e-3"), decimal("0.0001")],
            )
            .set("optimizer", "AdamW")
            .set("debug", true)
            .set("random_seed", 3i64)
            .set("model_version", 1i64)
            .set("dataset_path", std::path::PathBuf::from("/bin"))
            .set("ratios", vec![ratio(2, 3), ratio(1, 1), ratio(10, 3)])
            .build()
            .unwrap()
    }

    #[test]
    fn train_schema_is_well_formed() {
        assert_eq!(train_schema().check().unwrap().len(), 9);
    }

    #[test]
    fn train_record_builds() {
        assert_eq!(train_record().values().len(), 9);
    }
}
