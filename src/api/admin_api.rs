use super::ApiClient;
use crate::error::ObraError;
use crate::models::{
    Company, CompanyDraft, NewUser, NonWorkingDay, NonWorkingDayDraft, User, Validate,
};

pub fn list_companies(client: &ApiClient) -> Result<Vec<Company>, ObraError> {
    client.get("/companies/")
}

pub fn create_company(client: &ApiClient, draft: &CompanyDraft) -> Result<Company, ObraError> {
    draft.validate()?;
    client.post("/companies/", draft)
}

pub fn list_users(client: &ApiClient) -> Result<Vec<User>, ObraError> {
    client.get("/users/")
}

pub fn create_user(client: &ApiClient, user: &NewUser) -> Result<User, ObraError> {
    user.validate()?;
    client.post("/users/", user)
}

pub fn list_non_working_days(client: &ApiClient) -> Result<Vec<NonWorkingDay>, ObraError> {
    client.get("/settings/non-working-days/")
}

pub fn add_non_working_day(client: &ApiClient, draft: &NonWorkingDayDraft) -> Result<NonWorkingDay, ObraError> {
    client.post("/settings/non-working-days/", draft)
}

pub fn delete_non_working_day(client: &ApiClient, id: i64) -> Result<(), ObraError> {
    client.delete(&format!("/settings/non-working-days/{id}/"))
}
