mod catalog_load;
mod modifier_adjust;
mod time_based_rounding;
