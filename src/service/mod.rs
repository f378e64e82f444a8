pub mod advisor_service;
