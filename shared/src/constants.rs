// Identity header forwarded by the authenticating gateway
pub const USER_ID_HEADER: &str = "X-User-Id";

// Success messages
pub const SUCCESS_LIKED: &str = "Campaign liked";
pub const SUCCESS_UNLIKED: &str = "Like cancelled";
pub const SUCCESS_JOINED: &str = "Joined the campaign";
pub const SUCCESS_LEFT: &str = "Participation cancelled";
pub const SUCCESS_CAMPAIGN_CREATED: &str = "Campaign created";
pub const SUCCESS_CAMPAIGN_UPDATED: &str = "Campaign updated";
pub const SUCCESS_REVIEW_CREATED: &str = "Review created";
pub const SUCCESS_REVIEW_UPDATED: &str = "Review updated";
pub const SUCCESS_CATEGORY_CREATED: &str = "Category created";
pub const SUCCESS_ORDER_PLACED: &str = "Order placed";

// Error messages
pub const ERROR_NOT_RECRUITING_LIKE: &str = "Only recruiting campaigns can be liked";
pub const ERROR_NOT_RECRUITING_PARTICIPATE: &str = "Only recruiting campaigns can be joined";
pub const ERROR_NOT_RECRUITING_FUND: &str = "Only recruiting campaigns accept funding";
pub const ERROR_NOT_ENDED_REVIEW: &str = "Reviews can only be written for ended campaigns";
pub const ERROR_CAPACITY_EXCEEDED: &str = "The campaign has no room for more participants";
pub const ERROR_INSUFFICIENT_STOCK: &str = "Product stock is lower than the ordered quantity";
pub const ERROR_CAMPAIGN_WINDOW: &str = "Campaign start date cannot be later than the end date";
pub const ERROR_ACTIVITY_WINDOW: &str = "Activity start date cannot be later than the end date";
pub const ERROR_FUNDING_GOAL: &str = "Funding campaigns need a positive goal";
pub const ERROR_MEMBERS_BELOW_PARTICIPANTS: &str =
    "Capacity cannot drop below the number of current participants";
pub const ERROR_MONEY_RANGE: &str = "exceeds the largest storable amount";
pub const ERROR_MONEY_SCALE: &str = "cannot have more than two decimal places";
