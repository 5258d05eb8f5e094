use thiserror::Error;

pub type DataProductResult<T> = Result<T, DataProductError>;

/// Names the per-sample sequences of a calorimetry record, as supplied in the parallel-array form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SeriesField {
    #[strum(to_string = "dE/dx")]
    EnergyLoss,
    #[strum(to_string = "dQ/dx")]
    ChargeLoss,
    #[strum(to_string = "residual range")]
    ResidualRange,
    #[strum(to_string = "track pitch")]
    Pitch,
    #[strum(to_string = "space point positions")]
    Positions,
    #[strum(to_string = "wire")]
    Wire,
    #[strum(to_string = "dE")]
    DepositedEnergy,
    #[strum(to_string = "dQ")]
    CollectedCharge,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataProductError {
    #[error("{reference} and {field} have different sizes ({expected} != {found})")]
    LengthMismatch {
        reference: SeriesField,
        field: SeriesField,
        expected: usize,
        found: usize,
    },
}

/// Checks each supplied sequence length against the reference, in the given order.
/// The first disagreement is reported.
pub(crate) fn check_lengths<I>(
    reference: SeriesField,
    expected: usize,
    fields: I,
) -> DataProductResult<()>
where
    I: IntoIterator<Item = (SeriesField, usize)>,
{
    for (field, found) in fields {
        if found != expected {
            tracing::debug!(
                %reference,
                %field,
                expected,
                found,
                "Rejecting series with mismatched lengths"
            );
            return Err(DataProductError::LengthMismatch {
                reference,
                field,
                expected,
                found,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_mismatch_is_reported() {
        let result = check_lengths(
            SeriesField::EnergyLoss,
            3,
            [
                (SeriesField::ChargeLoss, 3),
                (SeriesField::ResidualRange, 2),
                (SeriesField::Pitch, 5),
            ],
        );
        assert_eq!(
            result,
            Err(DataProductError::LengthMismatch {
                reference: SeriesField::EnergyLoss,
                field: SeriesField::ResidualRange,
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn error_message_names_both_fields() {
        let error = DataProductError::LengthMismatch {
            reference: SeriesField::EnergyLoss,
            field: SeriesField::Wire,
            expected: 4,
            found: 1,
        };
        assert_eq!(error.to_string(), "dE/dx and wire have different sizes (4 != 1)");
    }

    #[test]
    fn equal_lengths_pass() {
        assert!(check_lengths(SeriesField::EnergyLoss, 0, []).is_ok());
        assert!(check_lengths(SeriesField::EnergyLoss, 2, [(SeriesField::ChargeLoss, 2)]).is_ok());
    }
}
