//! IELTS band score calculator: conversion tables and rounding rules in
//! [`scoring`], the turn-by-turn calculator dialog in [`dialog`], and the
//! configuration, error and telemetry plumbing shared by its transports.

pub mod config;
pub mod dialog;
pub mod error;
pub mod scoring;
pub mod telemetry;
