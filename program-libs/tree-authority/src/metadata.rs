use crate::{
    constants::{MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH, MAX_URI_LENGTH},
    error::{InvalidMetadata, MetadataField, TreeAuthorityError},
    AnchorDeserialize, AnchorSerialize,
};

/// Metadata of a collection. Compressed assets minted into the collection
/// reuse it.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

fn check_field(
    field: MetadataField,
    value: &str,
    max: usize,
    allow_empty: bool,
) -> Result<(), InvalidMetadata> {
    if value.len() > max {
        return Err(InvalidMetadata::TooLong {
            field,
            len: value.len(),
            max,
        });
    }
    if !allow_empty && value.is_empty() {
        return Err(InvalidMetadata::Empty(field));
    }
    if value.contains('\0') {
        return Err(InvalidMetadata::NulByte(field));
    }
    Ok(())
}

impl CollectionMetadata {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        uri: impl Into<String>,
    ) -> Result<Self, TreeAuthorityError> {
        let metadata = Self {
            name: name.into(),
            symbol: symbol.into(),
            uri: uri.into(),
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// Token metadata limits, lengths are in bytes. The symbol may be empty.
    pub fn validate(&self) -> Result<(), TreeAuthorityError> {
        check_field(MetadataField::Name, &self.name, MAX_NAME_LENGTH, false)?;
        check_field(MetadataField::Symbol, &self.symbol, MAX_SYMBOL_LENGTH, true)?;
        check_field(MetadataField::Uri, &self.uri, MAX_URI_LENGTH, false)?;
        Ok(())
    }

    /// Stored metadata strings are padded with NUL bytes to their maximum
    /// length.
    pub fn from_padded(name: &str, symbol: &str, uri: &str) -> Self {
        Self {
            name: name.trim_end_matches('\0').to_string(),
            symbol: symbol.trim_end_matches('\0').to_string(),
            uri: uri.trim_end_matches('\0').to_string(),
        }
    }
}
