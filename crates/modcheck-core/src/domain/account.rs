/// Bank account entity - a sort code plus an account number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    pub sort_code: String,
    pub account_number: String,
}

impl BankAccount {
    pub fn new(sort_code: impl Into<String>, account_number: impl Into<String>) -> Self {
        Self {
            sort_code: sort_code.into(),
            account_number: account_number.into(),
        }
    }

    /// Check the account has the expected lengths: a 6 character sort code
    /// and an account number between 6 and 10 characters.
    ///
    /// This is a shape check only. Whether the account actually passes the
    /// modulus checks is the resolver's job.
    pub fn has_expected_format(&self) -> bool {
        let sort_code_length = self.sort_code.len();
        let account_number_length = self.account_number.len();

        sort_code_length == 6 && (6..=10).contains(&account_number_length)
    }
}
