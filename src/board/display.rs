//! Text shown on order cards and in the admin table.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::Order;

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// `dd/mm/yyyy - Weekday.`
pub fn arrival_label(date: NaiveDate) -> String {
    format!("{} - {}.", date.format("%d/%m/%Y"), weekday_name(date.weekday()))
}

pub fn count_label(order: &Order) -> String {
    format!("{} orders / {} volumes", order.order_count, order.volume_count)
}

pub fn public_status_label(order: &Order) -> &'static str {
    if order.arrived {
        "Arrived at base"
    } else {
        "Not yet arrived"
    }
}

pub fn admin_status_label(order: &Order) -> &'static str {
    if order.arrived {
        "Arrived"
    } else {
        "Pending"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Customer;

    #[test]
    fn labels() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        assert_eq!(arrival_label(date), "08/03/2024 - Friday.");

        let order = Order::new("1", "NAT-1", Customer::Natura, date, 4, 11);
        assert_eq!(count_label(&order), "4 orders / 11 volumes");
        assert_eq!(public_status_label(&order), "Not yet arrived");
        assert_eq!(admin_status_label(&order.with_arrived(true)), "Arrived");
    }
}
